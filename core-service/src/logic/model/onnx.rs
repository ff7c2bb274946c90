//! ONNX Estimator - ONNX Runtime backend
//!
//! Loads an exported classifier (e.g. a gradient-boosted tree converted with
//! skl2onnx) and reads the malicious-class probability from its output.
//! Only compiled with the `onnx` feature.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::logic::error::{CoreResult, DetectionError};

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
    source: String,
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("source", &self.source)
            .field("output", &self.output_name)
            .finish()
    }
}

impl OnnxModel {
    pub fn load(model_path: &Path, output: Option<&str>) -> CoreResult<Self> {
        let display = model_path.display().to_string();
        log::info!("Loading ONNX model from {}", display);

        let session = Session::builder()
            .map_err(|e| DetectionError::artifact(&display, format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DetectionError::artifact(&display, format!("optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| DetectionError::artifact(&display, format!("load: {}", e)))?;

        let output_name = match output {
            Some(name) => {
                if !session.outputs.iter().any(|o| o.name == name) {
                    return Err(DetectionError::artifact(
                        &display,
                        format!("model has no output named '{}'", name),
                    ));
                }
                name.to_string()
            }
            None => session
                .outputs
                .last()
                .map(|o| o.name.clone())
                .ok_or_else(|| DetectionError::artifact(&display, "model defines no outputs"))?,
        };

        log::info!("ONNX model loaded (output '{}')", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            source: display,
        })
    }

    pub fn predict(&self, values: &[f32]) -> CoreResult<f64> {
        let input = Array2::<f32>::from_shape_vec((1, values.len()), values.to_vec())
            .map_err(|e| DetectionError::Inference(format!("array error: {}", e)))?;
        let tensor = Value::from_array(input)
            .map_err(|e| DetectionError::Inference(format!("tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| DetectionError::Inference(format!("{}: {}", self.source, e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| DetectionError::Inference(format!("missing output '{}'", self.output_name)))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectionError::Inference(format!("extract error: {}", e)))?;

        // [p_benign, p_malicious] for two-column outputs
        let probability = match data.len() {
            0 => return Err(DetectionError::Inference("empty output tensor".to_string())),
            1 => data[0],
            _ => data[1],
        };
        Ok(f64::from(probability))
    }
}
