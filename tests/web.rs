//! Browser-side tests for the JavaScript facade.
//!
//! Run with `wasm-pack test --headless --chrome` (or `--node`).

#![cfg(target_arch = "wasm32")]

use force_sim_wasm::ForceSimulatorWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn positions_read_back_with_vacant_slots() {
    let mut wasm = ForceSimulatorWasm::new();
    let ids = wasm.add_bodies_from_positions(&[0.0, 0.0, 10.0, 0.0, 20.0, 0.0]);
    assert!(wasm.remove_body(ids[1]));

    let positions = wasm.get_positions().to_vec();
    assert_eq!(positions.len(), 6);
    assert_eq!(positions[4], 20.0);
    assert!(positions[2].is_nan());

    let velocities = wasm.get_velocities().to_vec();
    assert_eq!(&velocities[0..2], &[0.0, 0.0]);
}

#[wasm_bindgen_test]
fn errors_surface_as_js_errors() {
    let mut wasm = ForceSimulatorWasm::new();
    let a = wasm.add_body(0.0, 0.0, 1.0).ok().unwrap();

    assert!(wasm.add_body(0.0, 0.0, -1.0).is_err());
    assert!(wasm.add_link(a, a, -1.0, -1.0).is_err());
    assert!(wasm.add_link(a, 99, -1.0, -1.0).is_err());
    assert!(wasm.step(-1.0).is_err());
    assert!(wasm.set_integrator("leapfrog").is_err());

    let drag = wasm.add_drag_force();
    assert!(wasm.set_force_parameter(drag, "Nope", 1.0).is_err());
}

#[wasm_bindgen_test]
fn config_round_trip_through_js() {
    let source = ForceSimulatorWasm::new();
    let config = source.get_config().ok().unwrap();

    let rebuilt = ForceSimulatorWasm::with_config(config).ok().unwrap();
    assert_eq!(rebuilt.get_integrator(), "runge_kutta");
    assert_eq!(rebuilt.force_count(), 0);

    let config = js_sys::JSON::parse(
        r#"{ "integrator": "euler", "forces": [{ "type": "nBody" }, { "type": "drag", "dragCoefficient": 0.02 }] }"#,
    )
    .ok()
    .unwrap();
    let mut wasm = ForceSimulatorWasm::with_config(config).ok().unwrap();
    assert_eq!(wasm.get_integrator(), "euler");
    assert_eq!(wasm.force_count(), 2);
    assert_eq!(wasm.get_force_parameter(1, "DragCoefficient").ok(), Some(0.02));

    wasm.add_bodies_from_positions(&[0.0, 0.0, 1.0, 0.0]);
    assert!(wasm.step(0.1).is_ok());
    assert!(wasm.get_body_x(0).unwrap() < 0.0);

    assert!(ForceSimulatorWasm::with_config(JsValue::from_str("not a config")).is_err());
}
