// Probebench Infrastructure - Signal transcript adapters
// Implements: SignalSink as JSON lines (file or stdout)

pub mod jsonl_sink;

pub use jsonl_sink::JsonLinesSink;
