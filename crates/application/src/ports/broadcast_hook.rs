/// Events emitted after every policy mutation and at apply boundaries for
/// out-of-band observers (e.g. a WebSocket fan-out sitting outside this
/// core). No consumer is required.
#[derive(Debug, Clone)]
pub enum Event {
    EntryUpserted { id: i64, is_new: bool },
    EntryDeleted { id: i64 },
    JailTriggered { jail: String, ip: String },
    ApplyStart,
    ApplyProgress { table: String },
    ApplyComplete { in_sync: bool },
}

/// Optional callback invoked by use cases and the reconciler. Defaults to a
/// no-op so the core never requires a consumer.
pub trait BroadcastHookPort: Send + Sync {
    fn on_event(&self, event: Event);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBroadcastHook;

impl BroadcastHookPort for NoopBroadcastHook {
    fn on_event(&self, _event: Event) {}
}
