//! visitor pattern helpers
mod visit_active_text;
pub use visit_active_text::VisitActiveText;

/// Visitor that visits its subjects
pub trait Visit<T: ?Sized> {
    fn visit(&mut self, value: &T);
}

// blanket impl for FnMut
impl<T, F> Visit<T> for F
where
    T: ?Sized,
    F: FnMut(&T),
{
    fn visit(&mut self, value: &T) {
        self(value)
    }
}
