use tracing::warn;

use crate::surface::Surface;
use crate::wizard::step::FieldError;

/// Where each error of an annotation pass ended up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    pub fields: Vec<String>,
    pub groups: Vec<String>,
    pub unresolved: Vec<String>,
}

impl AnnotationReport {
    pub fn is_clean(&self) -> bool {
        self.fields.is_empty() && self.groups.is_empty() && self.unresolved.is_empty()
    }
}

pub struct ErrorAnnotator;

impl ErrorAnnotator {
    /// Clears every marker of the mount, then renders `errors` in order.
    ///
    /// A target that names a field marks that field; otherwise it is tried
    /// as a group key and gets an adjacent advisory.
    pub fn annotate<S: Surface + ?Sized>(
        surface: &mut S,
        flow: &str,
        errors: &[FieldError],
    ) -> AnnotationReport {
        surface.clear_errors(flow);

        let mut report = AnnotationReport::default();
        for error in errors {
            if surface.has_field(flow, &error.target) {
                surface.mark_field(flow, &error.target, &error.message);
                report.fields.push(error.target.clone());
            } else if surface.has_group(flow, &error.target) {
                surface.mark_group(flow, &error.target, &format!("⚠ {}", error.message));
                report.groups.push(error.target.clone());
            } else {
                warn!(flow, target = %error.target, "validation error target not found in mount");
                report.unresolved.push(error.target.clone());
            }
        }
        report
    }

    pub fn clear<S: Surface + ?Sized>(surface: &mut S, flow: &str) {
        surface.clear_errors(flow);
    }
}
