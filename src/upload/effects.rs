//! Page updates announced to the browser after a save.
//!
//! The events are sent in the `HX-Trigger` header and handled by the upload
//! page script. htmx fires them in the order they are listed.

/// A change the upload page makes once the backend has stored a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEffect {
    /// Hide the single receipt review modal.
    CloseReviewModal,
    /// Clear the single receipt review form.
    ResetReviewForm,
    /// Show the "saved" confirmation.
    ShowSuccessModal,
    /// Hide the bulk review modal.
    CloseBulkModal,
    /// Show the bulk result summary.
    ShowBulkSuccessModal,
}

impl UiEffect {
    /// The name of the DOM event for this effect.
    pub fn event_name(self) -> &'static str {
        match self {
            UiEffect::CloseReviewModal => "close-review-modal",
            UiEffect::ResetReviewForm => "reset-review-form",
            UiEffect::ShowSuccessModal => "show-success-modal",
            UiEffect::CloseBulkModal => "close-bulk-modal",
            UiEffect::ShowBulkSuccessModal => "show-bulk-success-modal",
        }
    }
}

/// What happens after a single receipt was saved.
pub const SINGLE_CONFIRM_EFFECTS: [UiEffect; 3] = [
    UiEffect::CloseReviewModal,
    UiEffect::ResetReviewForm,
    UiEffect::ShowSuccessModal,
];

/// What happens after a batch of receipts was saved.
pub const BULK_CONFIRM_EFFECTS: [UiEffect; 2] =
    [UiEffect::CloseBulkModal, UiEffect::ShowBulkSuccessModal];

/// The `HX-Trigger` header value that fires `effects` in order.
pub fn trigger_header(effects: &[UiEffect]) -> String {
    effects
        .iter()
        .map(|effect| effect.event_name())
        .collect::<Vec<_>>()
        .join(", ")
}
