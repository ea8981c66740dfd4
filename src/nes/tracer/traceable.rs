/// Something that can describe its state to the tracer
pub trait Traceable {
    /// Short component label (e.g. "CPU", "PPU")
    fn trace_name(&self) -> &'static str;

    /// Current state, or `None` when there is nothing worth recording
    fn trace_state(&self) -> Option<String>;

    fn trace(&self) -> Option<String> {
        self.trace_state()
            .map(|state| format!("{} {}", self.trace_name(), state))
    }
}
