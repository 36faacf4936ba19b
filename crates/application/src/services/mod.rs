mod escalation_service;

pub use escalation_service::EscalationService;
