//! Shared test utilities for the eco-album test suite.
//!
//! [`FakeTransport`] stands in for the HTTP transport: responses are stubbed
//! per request (keyed by the request's display form, `path?query`) and every
//! request is recorded.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fake = FakeTransport::new();
//! fake.respond("galeria/estadisticas/", Ok(stats_json()));
//! let catalog = Catalog::new(fake.clone());
//! // ...
//! assert_eq!(fake.count("galeria/estadisticas/"), 1);
//! ```

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ApiError, Request, Transport};

#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<String, Result<Value, ApiError>>>,
    requests: Mutex<Vec<Request>>,
    delay: Mutex<Option<Duration>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, key: &str, response: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(key.to_string(), response);
    }

    /// Delay every response by `delay` (tokio time, so paused clocks apply).
    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, key: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.to_string() == key)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, request: &Request) -> Result<Value, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let key = request.to_string();
        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(ApiError::Status {
                    status: 404,
                    message: format!("no stub for {key}"),
                })
            })
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn animal_json(id: u64, name: &str, status: &str) -> Value {
    json!({
        "id_animal": id,
        "nombre_comun": name,
        "nombre_cientifico": format!("{name} sp."),
        "estado": status,
        "id_categoria": 1,
        "habitat": "Bosque",
        "url_imagen": format!("https://img.example/{id}.jpg"),
    })
}

pub fn page_json(results: Vec<Value>) -> Value {
    json!({"count": results.len(), "next": null, "previous": null, "results": results})
}

pub fn gallery_photo_json(id: u64, kind: &str, name: &str) -> Value {
    json!({
        "id": id,
        "tipo": kind,
        "nombre": name,
        "url_foto": format!("https://img.example/g{id}.jpg"),
        "descripcion_foto": format!("Foto de {name}"),
        "especie_id": id * 10,
    })
}

pub fn stats_json() -> Value {
    json!({
        "total_animales": 12, "total_plantas": 8, "total_fotos_fauna": 30,
        "total_fotos_flora": 20, "total_especies": 20, "total_fotos": 50
    })
}
