#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    chat_overlay_lib::run();
}
