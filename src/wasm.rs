//! WebAssembly bindings for Rocket Lander.
//!
//! Provides a thin wrapper around `GenerationController` for browser front ends.
//! The page owns the animation loop and the canvas; it calls `tick` once per
//! frame and draws whatever `getSnapshot` returns.

use wasm_bindgen::prelude::*;

use crate::{
    GenerationController,
    schema::{Environment, LanderConfig, RunState},
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for the generation controller.
#[wasm_bindgen]
pub struct WasmLander {
    controller: GenerationController,
}

#[wasm_bindgen]
impl WasmLander {
    /// Create a controller from JSON configuration.
    ///
    /// # Arguments
    /// * `config_json` - JSON string containing LanderConfig (missing fields use defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmLander, JsValue> {
        let config: LanderConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?;

        Ok(WasmLander {
            controller: GenerationController::new(config),
        })
    }

    /// Start (or restart) a run.
    #[wasm_bindgen]
    pub fn start(&mut self) {
        self.controller.start();
    }

    /// Advance the simulation. Returns true if a generation finished.
    #[wasm_bindgen]
    pub fn tick(&mut self, step_multiplier: f32) -> bool {
        self.controller.tick(step_multiplier).is_some()
    }

    /// End the current generation immediately.
    #[wasm_bindgen(js_name = forceEnd)]
    pub fn force_end(&mut self) -> bool {
        self.controller.force_end().is_some()
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.controller.toggle_pause();
    }

    /// Stop the run, keeping the best recorded flight.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Replace the arena settings from JSON. Wind applies at once; the rest
    /// waits for the next generation.
    #[wasm_bindgen(js_name = setEnvironment)]
    pub fn set_environment(&mut self, environment_json: &str) -> Result<(), JsValue> {
        let environment: Environment = serde_json::from_str(environment_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid environment JSON: {e}")))?;
        self.controller.set_environment(environment);
        Ok(())
    }

    #[wasm_bindgen(js_name = setWind)]
    pub fn set_wind(&mut self, wind_force: f32) {
        self.controller.set_wind(wind_force);
    }

    #[wasm_bindgen(js_name = setLifetime)]
    pub fn set_lifetime(&mut self, lifetime: usize) {
        self.controller.set_lifetime(lifetime);
    }

    /// Get the full controller snapshot.
    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.controller.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get the per-generation statistics history.
    #[wasm_bindgen(js_name = getHistory)]
    pub fn get_history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.controller.history())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Get the best-ever trajectory for replay.
    #[wasm_bindgen(js_name = getReplay)]
    pub fn get_replay(&self) -> Result<JsValue, JsValue> {
        let player = self
            .controller
            .replay()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let frames: Vec<_> = player.frames().collect();
        serde_wasm_bindgen::to_value(&frames)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = getGeneration)]
    pub fn get_generation(&self) -> usize {
        self.controller.generation()
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.controller.state() == RunState::Running
    }
}
