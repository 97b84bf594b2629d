//! Custom Resource Definitions (CRDs) for machine-template-webhook.
//!
//! - `YandexMachineTemplate`: blueprint for generated YandexMachines

mod yandex_machine_template;

pub use yandex_machine_template::*;
