//! WASM bindings for Bridge Lab.
//!
//! This module provides JavaScript-friendly bindings for the browser front end,
//! which renders the apparatus and forwards drag, plug and key events here.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmMetreBridge } from 'bridge_lab';
//!
//! await init();
//!
//! const bridge = new WasmMetreBridge();
//! bridge.set_circuit_on(true);
//!
//! // On pointer move over the wire:
//! bridge.set_parameter('jockeyPosition', fraction * 100);
//! needle.style.transform = `rotate(${bridge.deflection}deg)`;
//! recordButton.disabled = !bridge.can_record;
//! ```

use wasm_bindgen::prelude::*;

use crate::error::LabError;
use crate::experiment::{
    CombinationMode, Experiment, MetreBridge, OhmsLaw, Parameter, ResistanceCombination,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn to_js(err: LabError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn set_named<E: Experiment>(experiment: &mut E, name: &str, value: f64) -> Result<(), JsValue> {
    let param: Parameter = name.parse().map_err(to_js)?;
    experiment.set_parameter(param, value).map_err(to_js)
}

/// Metre bridge session for the browser.
#[wasm_bindgen]
pub struct WasmMetreBridge {
    inner: MetreBridge,
}

#[wasm_bindgen]
impl WasmMetreBridge {
    /// Create a bridge with bench defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmMetreBridge {
        WasmMetreBridge {
            inner: MetreBridge::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn circuit_on(&self) -> bool {
        self.inner.is_circuit_on()
    }

    pub fn set_circuit_on(&mut self, on: bool) {
        self.inner.set_circuit_on(on);
    }

    /// Set a parameter by name (`knownResistance`, `jockeyPosition`,
    /// `wireLength`, `wireDiameter`).
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        set_named(&mut self.inner, name, value)
    }

    /// Pull or insert a resistance box plug. Returns the new known resistance.
    pub fn toggle_plug(&mut self, index: usize) -> Result<f64, JsValue> {
        self.inner.toggle_plug(index).map_err(to_js)
    }

    /// Which plugs are out, in lid order.
    pub fn plugs_out(&self) -> Vec<u8> {
        self.inner
            .resistance_box()
            .plugs()
            .iter()
            .map(|p| p.removed as u8)
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn known_resistance(&self) -> f64 {
        self.inner.known_resistance()
    }

    #[wasm_bindgen(getter)]
    pub fn jockey_position(&self) -> f64 {
        self.inner.jockey_position()
    }

    /// Galvanometer deflection in degrees.
    #[wasm_bindgen(getter)]
    pub fn deflection(&self) -> f64 {
        self.inner.deflection()
    }

    #[wasm_bindgen(getter)]
    pub fn is_balanced(&self) -> bool {
        self.inner.is_balanced()
    }

    #[wasm_bindgen(getter)]
    pub fn can_record(&self) -> bool {
        self.inner.can_record()
    }

    /// Record the current balance. Rejections come back as error strings.
    pub fn record(&mut self) -> Result<(), JsValue> {
        self.inner.record().map(|_| ()).map_err(to_js)
    }

    /// Observation table flattened as `[serial, R, l, S, serial, R, l, S, ...]`.
    pub fn observations(&self) -> Vec<f64> {
        self.inner
            .observations()
            .iter()
            .flat_map(|o| {
                [
                    o.serial as f64,
                    o.known_resistance,
                    o.balance_length,
                    o.unknown_resistance,
                ]
            })
            .collect()
    }

    pub fn calculate(&mut self) -> Result<(), JsValue> {
        self.inner.calculate().map(|_| ()).map_err(to_js)
    }

    /// Mean S, or `undefined` before a successful calculation.
    #[wasm_bindgen(getter)]
    pub fn mean_resistance(&self) -> Option<f64> {
        self.inner.results().map(|r| r.mean_resistance)
    }

    /// Resistivity in Ω·m, or `undefined` before a successful calculation.
    #[wasm_bindgen(getter)]
    pub fn resistivity(&self) -> Option<f64> {
        self.inner.results().map(|r| r.resistivity)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for WasmMetreBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Ohm's law board for the browser.
#[wasm_bindgen]
pub struct WasmOhmsLaw {
    inner: OhmsLaw,
}

#[wasm_bindgen]
impl WasmOhmsLaw {
    /// Create a board with bench defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmOhmsLaw {
        WasmOhmsLaw {
            inner: OhmsLaw::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn circuit_on(&self) -> bool {
        self.inner.is_circuit_on()
    }

    pub fn set_circuit_on(&mut self, on: bool) {
        self.inner.set_circuit_on(on);
    }

    /// Set a parameter by name (`rheostatValue`).
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        set_named(&mut self.inner, name, value)
    }

    #[wasm_bindgen(getter)]
    pub fn rheostat_position(&self) -> f64 {
        self.inner.rheostat_position()
    }

    #[wasm_bindgen(getter)]
    pub fn ammeter_reading(&self) -> f64 {
        self.inner.ammeter_reading()
    }

    #[wasm_bindgen(getter)]
    pub fn voltmeter_reading(&self) -> f64 {
        self.inner.voltmeter_reading()
    }

    #[wasm_bindgen(getter)]
    pub fn ammeter_needle(&self) -> f64 {
        self.inner.ammeter_needle()
    }

    #[wasm_bindgen(getter)]
    pub fn voltmeter_needle(&self) -> f64 {
        self.inner.voltmeter_needle()
    }

    #[wasm_bindgen(getter)]
    pub fn can_record(&self) -> bool {
        self.inner.can_record()
    }

    pub fn record(&mut self) -> Result<(), JsValue> {
        self.inner.record().map(|_| ()).map_err(to_js)
    }

    /// Observation table flattened as `[serial, V, I, ...]`.
    pub fn observations(&self) -> Vec<f64> {
        self.inner
            .observations()
            .iter()
            .flat_map(|o| [o.serial as f64, o.voltage, o.current])
            .collect()
    }

    /// Graph points flattened as `[I, V, I, V, ...]`.
    pub fn graph_points(&self) -> Vec<f64> {
        self.inner
            .graph_points()
            .into_iter()
            .flat_map(|(i, v)| [i, v])
            .collect()
    }

    pub fn calculate(&mut self) -> Result<(), JsValue> {
        self.inner.calculate().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn resistance(&self) -> Option<f64> {
        self.inner.results().map(|r| r.resistance)
    }

    #[wasm_bindgen(getter)]
    pub fn resistance_per_cm(&self) -> Option<f64> {
        self.inner.results().map(|r| r.resistance_per_cm)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for WasmOhmsLaw {
    fn default() -> Self {
        Self::new()
    }
}

/// Resistance combination session for the browser.
#[wasm_bindgen]
pub struct WasmCombination {
    inner: ResistanceCombination,
}

#[wasm_bindgen]
impl WasmCombination {
    /// Create a session with bench defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCombination {
        WasmCombination {
            inner: ResistanceCombination::new(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn circuit_on(&self) -> bool {
        self.inner.is_circuit_on()
    }

    pub fn set_circuit_on(&mut self, on: bool) {
        self.inner.set_circuit_on(on);
    }

    /// Set a parameter by name (`knownResistance`, `jockeyPosition`, `r1`, `r2`).
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        set_named(&mut self.inner, name, value)
    }

    /// Connect the coils: `"Series"` or `"Parallel"`.
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode: CombinationMode = mode.parse().map_err(to_js)?;
        self.inner.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        self.inner.mode().to_string()
    }

    pub fn toggle_plug(&mut self, index: usize) -> Result<f64, JsValue> {
        self.inner.toggle_plug(index).map_err(to_js)
    }

    pub fn plugs_out(&self) -> Vec<u8> {
        self.inner
            .resistance_box()
            .plugs()
            .iter()
            .map(|p| p.removed as u8)
            .collect()
    }

    #[wasm_bindgen(getter)]
    pub fn deflection(&self) -> f64 {
        self.inner.deflection()
    }

    #[wasm_bindgen(getter)]
    pub fn is_balanced(&self) -> bool {
        self.inner.is_balanced()
    }

    #[wasm_bindgen(getter)]
    pub fn can_record(&self) -> bool {
        self.inner.can_record()
    }

    pub fn record(&mut self) -> Result<(), JsValue> {
        self.inner.record().map(|_| ()).map_err(to_js)
    }

    /// Observation table flattened as `[serial, parallel?, R, l, S, ...]`
    /// where the mode flag is 0 for series and 1 for parallel.
    pub fn observations(&self) -> Vec<f64> {
        self.inner
            .observations()
            .iter()
            .flat_map(|o| {
                [
                    o.serial as f64,
                    (o.mode == CombinationMode::Parallel) as u8 as f64,
                    o.known_resistance,
                    o.balance_length,
                    o.experimental_resistance,
                ]
            })
            .collect()
    }

    pub fn calculate(&mut self) -> Result<(), JsValue> {
        self.inner.calculate().map(|_| ()).map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn series_experimental(&self) -> Option<f64> {
        self.inner.results().and_then(|r| r.series.experimental)
    }

    #[wasm_bindgen(getter)]
    pub fn series_error(&self) -> Option<f64> {
        self.inner.results().and_then(|r| r.series.percentage_error)
    }

    #[wasm_bindgen(getter)]
    pub fn parallel_experimental(&self) -> Option<f64> {
        self.inner.results().and_then(|r| r.parallel.experimental)
    }

    #[wasm_bindgen(getter)]
    pub fn parallel_error(&self) -> Option<f64> {
        self.inner.results().and_then(|r| r.parallel.percentage_error)
    }

    /// Theoretical `[series, parallel]` for the current coils.
    pub fn theoretical(&self) -> Vec<f64> {
        let (series, parallel) = self.inner.theoretical();
        vec![series, parallel]
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl Default for WasmCombination {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
