use serde::{Deserialize, Serialize};

/// A single setpoint on the target temperature curve.
///
/// `x` is seconds since process start, `y` is temperature in °C. The
/// controller backend and the recipe file format both use these exact
/// field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub x: f64,
    pub y: f64,
}

impl ProfilePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One measured sample reported by the control process.
///
/// The backend emits additional diagnostic fields (`target_temp`, `mv`,
/// the per-term PID contributions); only the fields the client consumes
/// are modeled here — serde skips the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSample {
    /// Unix timestamp (seconds) the sample was taken at.
    pub timestamp: f64,
    /// Seconds elapsed since the control loop started.
    #[serde(rename = "time_passed")]
    pub seconds_since_start: f64,
    /// Measured temperature in °C.
    pub current_temp: f64,
    /// Fraction of the sample interval the heater was powered (0..=1).
    #[serde(rename = "power_on_time")]
    pub power_fraction: f64,
}

/// PID controller gains plus the sample interval.
///
/// The backend stores these as floats; the client always sends `dt = 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidParams {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    #[serde(default = "default_dt")]
    pub dt: f64,
}

fn default_dt() -> f64 {
    1.0
}

impl PidParams {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            dt: default_dt(),
        }
    }

    /// All fields parseable as finite numbers — the backend rejects
    /// anything else.
    pub fn is_finite(&self) -> bool {
        [self.kp, self.ki, self.kd, self.dt]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One entry of the linearly interpolated per-second target curve the
/// backend derives from the submitted profile. Only appears in chart
/// data exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpPoint {
    /// Seconds since process start.
    pub time: f64,
    /// Target temperature in °C.
    pub temp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_decodes_backend_field_names() {
        let json = r#"{
            "time_passed": 2,
            "target_temp": 31.0,
            "current_temp": 28.5,
            "timestamp": 1700000002.5,
            "power_on_time": 0.42,
            "mv": 420.0,
            "vp": 25.0,
            "vi": 0.4,
            "vd": 18.0,
            "integral": 4.1
        }"#;
        let sample: TemperatureSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.seconds_since_start, 2.0);
        assert_eq!(sample.current_temp, 28.5);
        assert_eq!(sample.power_fraction, 0.42);
    }

    #[test]
    fn pid_params_default_dt() {
        let params: PidParams = serde_json::from_str(r#"{"kp":10.0,"ki":0.1,"kd":18.0}"#).unwrap();
        assert_eq!(params.dt, 1.0);
        assert!(params.is_finite());
    }
}
