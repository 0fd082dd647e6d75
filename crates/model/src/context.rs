//! Outbound response collaborator.

/// Side-effect sink for the renderer: content type and response status.
/// The renderer only writes; it never reads these back.
pub trait RenderContext {
    /// Set the content type unless the caller already picked one.
    fn set_content_type_if_unset(&mut self, content_type: &str);

    /// Set the response status code.
    fn set_status(&mut self, status: u16);
}

/// Plain response-parts sink, usable by hosts and tests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResponseParts {
    pub content_type: Option<String>,
    pub status: Option<u16>,
}

impl RenderContext for ResponseParts {
    fn set_content_type_if_unset(&mut self, content_type: &str) {
        if self.content_type.is_none() {
            self.content_type = Some(content_type.to_owned());
        }
    }

    fn set_status(&mut self, status: u16) {
        self.status = Some(status);
    }
}
