// Application layer - Registry, dispatch and synchronization use cases
pub mod control_dispatcher;
pub mod events;
pub mod push_channel;
pub mod status_report;
pub mod sync_engine;
pub mod widget_registry;
