//! WASM bindings for Logsim Core.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmLogicSim } from 'logsim_core';
//!
//! await init();
//!
//! const source = `
//!   DEVICES { SW = SWITCH(initial_state: 0); N = NAND(number_of_inputs: 1); }
//!   CONNECT { SW = N.I1; }
//!   MONITOR { N; }
//!   END
//! `;
//!
//! const sim = new WasmLogicSim(source, 42n);
//! sim.run(10);
//! sim.set_switch("SW", true);
//! sim.continue_run(10);
//! console.log(sim.display_signals());
//! ```

use wasm_bindgen::prelude::*;

use crate::circuit::{Circuit, Signal};
use crate::dsl::{self, Reporter};
use crate::solver::{Simulator, SimulatorConfig};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// WASM-compatible logic simulator.
#[wasm_bindgen]
pub struct WasmLogicSim {
    simulator: Simulator,
    diagnostics: String,
}

#[wasm_bindgen]
impl WasmLogicSim {
    /// Parse `source` and build a simulator.
    ///
    /// On failure the error value is the full diagnostic transcript.
    #[wasm_bindgen(constructor)]
    pub fn new(source: &str, seed: Option<u64>) -> Result<WasmLogicSim, JsValue> {
        let mut reporter = Reporter::silent();
        let circuit = match seed {
            Some(seed) => Circuit::with_seed(seed),
            None => Circuit::new(),
        };
        let circuit = dsl::parse_into(source, circuit, &mut reporter)
            .map_err(|_| JsValue::from_str(&reporter.transcript()))?;

        let mut config = SimulatorConfig::new();
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }
        Ok(WasmLogicSim {
            simulator: Simulator::with_config(circuit, config),
            diagnostics: reporter.transcript(),
        })
    }

    /// Diagnostic transcript of the parse.
    #[wasm_bindgen(getter)]
    pub fn diagnostics(&self) -> String {
        self.diagnostics.clone()
    }

    /// Cold-start and simulate `cycles` cycles.
    #[wasm_bindgen]
    pub fn run(&mut self, cycles: usize) -> Result<(), JsValue> {
        self.simulator.run(cycles).map_err(js_error)
    }

    /// Simulate `cycles` more cycles.
    #[wasm_bindgen]
    pub fn continue_run(&mut self, cycles: usize) -> Result<(), JsValue> {
        self.simulator.continue_run(cycles).map_err(js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn cycles_completed(&self) -> usize {
        self.simulator.cycles_completed()
    }

    #[wasm_bindgen]
    pub fn set_switch(&mut self, name: &str, high: bool) -> Result<(), JsValue> {
        self.simulator
            .set_switch(name, Signal::from_bool(high))
            .map_err(js_error)
    }

    /// Names of all switches.
    #[wasm_bindgen]
    pub fn switches(&self) -> Vec<String> {
        self.simulator.switches().into_iter().map(str::to_string).collect()
    }

    #[wasm_bindgen]
    pub fn add_monitor(&mut self, signal: &str) -> Result<(), JsValue> {
        self.simulator.add_monitor(signal).map_err(js_error)
    }

    #[wasm_bindgen]
    pub fn remove_monitor(&mut self, signal: &str) -> Result<(), JsValue> {
        self.simulator.remove_monitor(signal).map_err(js_error)
    }

    /// Outputs that are currently monitored.
    #[wasm_bindgen]
    pub fn monitored(&self) -> Vec<String> {
        self.simulator.signal_names().0
    }

    /// Outputs that could be monitored.
    #[wasm_bindgen]
    pub fn unmonitored(&self) -> Vec<String> {
        self.simulator.signal_names().1
    }

    /// Recorded levels of a monitored output: 0, 1, or -1 for cycles run
    /// before the monitor existed. `undefined` if not monitored.
    #[wasm_bindgen]
    pub fn history(&self, signal: &str) -> Option<Vec<i8>> {
        self.simulator.history(signal).map(|levels| {
            levels
                .iter()
                .map(|level| match level {
                    Some(Signal::High) => 1,
                    Some(Signal::Low) => 0,
                    None => -1,
                })
                .collect()
        })
    }

    /// Text rendering of every monitored trace.
    #[wasm_bindgen]
    pub fn display_signals(&self) -> String {
        self.simulator.display_signals()
    }
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
