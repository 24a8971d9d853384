/// Callback run when the user dismisses an access-denied notice.
pub type Acknowledge = Box<dyn FnOnce() + Send>;

/// View that tells the user they may not see the requested page.
pub trait AccessDeniedPresenter: Send + Sync {
    /// Show `message`; call `on_acknowledge` once the user dismisses it.
    fn show(&self, message: &str, on_acknowledge: Acknowledge);
}
