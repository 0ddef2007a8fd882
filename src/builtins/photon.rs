//! Photonic built-ins: photon_energy, measure_qubit, quantum_random
//!
//! Thin functions, either deterministic physics helpers or RNG-backed
//! measurements. The evaluator treats them like any other built-in.

use super::{define_native, expect_arity, number_arg};
use crate::env::Environment;
use crate::value::Value;
use std::rc::Rc;

/// Planck constant times the speed of light, in eV·nm.
const HC_EV_NM: f64 = 1239.841984;

pub fn register(env: &Rc<Environment>) {
    // Photon energy in eV for a wavelength in nanometres: E = hc / lambda.
    define_native(env, "photon_energy", |args, _env| {
        expect_arity("photon_energy", args, 1)?;
        let wavelength = number_arg("photon_energy", args, 0)?;
        if wavelength <= 0.0 {
            return Err("photon_energy: wavelength must be positive".to_string());
        }
        Ok(Value::Number(HC_EV_NM / wavelength))
    });

    // Collapses a qubit with the given |1> probability to 0 or 1.
    define_native(env, "measure_qubit", |args, _env| {
        expect_arity("measure_qubit", args, 1)?;
        let p = number_arg("measure_qubit", args, 0)?;
        if !(0.0..=1.0).contains(&p) {
            return Err("measure_qubit: probability must be in [0, 1]".to_string());
        }
        let outcome = if rand::random::<f64>() < p { 1.0 } else { 0.0 };
        Ok(Value::Number(outcome))
    });

    define_native(env, "quantum_random", |args, _env| {
        expect_arity("quantum_random", args, 0)?;
        Ok(Value::Number(rand::random::<f64>()))
    });
}
