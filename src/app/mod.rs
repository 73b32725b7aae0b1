// Application layer: pipelines composed from core logic and adapters.

pub mod pipelines;
