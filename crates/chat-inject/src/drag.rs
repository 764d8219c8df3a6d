//! Drag grip injected into the frameless overlay windows.
//!
//! The hosted page has no title bar, so a thin strip along the left edge
//! carries the `data-tauri-drag-region` attribute the webview runtime
//! turns into a window drag. The grip sits above the page content; when
//! click-through is on the whole window ignores the cursor anyway.

/// JS that creates-or-keeps the drag grip element with the given id.
/// Safe to evaluate repeatedly.
pub fn drag_grip_js(id: &str) -> String {
    format!(
        "var grip = document.getElementById('{id}');\n\
         if (!grip) {{\n\
             grip = document.createElement('div');\n\
             grip.id = '{id}';\n\
             grip.setAttribute('data-tauri-drag-region', '');\n\
             document.body.appendChild(grip);\n\
         }}\n\
         grip.style.cssText = 'position: fixed; top: 0; left: 0; width: 30px; \
height: 100%; z-index: 2147483647; cursor: grab; background: transparent;';"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grip_carries_the_drag_region_attribute() {
        let js = drag_grip_js("overlay-drag-grip");
        assert!(js.contains("setAttribute('data-tauri-drag-region', '')"));
        assert!(js.contains("grip.id = 'overlay-drag-grip'"));
    }

    #[test]
    fn grip_is_a_fixed_strip_along_the_left_edge() {
        let js = drag_grip_js("alerts-drag-grip");
        assert!(js.contains("position: fixed"));
        assert!(js.contains("width: 30px"));
        assert!(js.contains("height: 100%"));
    }

    #[test]
    fn reinjection_keeps_a_single_grip() {
        // Creation is guarded by a getElementById check, so evaluating the
        // script twice leaves exactly one element with the fixed id.
        let js = drag_grip_js("overlay-drag-grip");
        assert!(js.contains("getElementById('overlay-drag-grip')"));
        assert_eq!(js.matches("createElement").count(), 1);
    }
}
