use std::path::PathBuf;

/// Drop zone and file picker for the upload surface.
///
/// `dragging` only drives the highlight of the drop zone; it never affects
/// what gets submitted. Each interaction yields at most one file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DropTarget {
    dragging: bool,
}

impl DropTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Ends a drag and returns the first dropped file.
    pub fn drop_files<I, P>(&mut self, paths: I) -> Option<PathBuf>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dragging = false;
        paths.into_iter().next().map(Into::into)
    }

    /// Explicit selection through the picker; a cancelled picker yields `None`.
    pub fn pick<P: Into<PathBuf>>(&self, path: Option<P>) -> Option<PathBuf> {
        path.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_state_resets_on_leave() {
        let mut target = DropTarget::new();
        target.drag_over();
        assert!(target.is_dragging());
        target.drag_leave();
        assert!(!target.is_dragging());
    }

    #[test]
    fn drop_resets_drag_state_and_keeps_first_file() {
        let mut target = DropTarget::new();
        target.drag_over();
        let picked = target.drop_files(["scan.dcm", "second.dcm"]);
        assert!(!target.is_dragging());
        assert_eq!(picked, Some(PathBuf::from("scan.dcm")));
    }

    #[test]
    fn empty_drop_yields_nothing() {
        let mut target = DropTarget::new();
        target.drag_over();
        assert_eq!(target.drop_files(Vec::<PathBuf>::new()), None);
        assert!(!target.is_dragging());
    }

    #[test]
    fn cancelled_picker_yields_nothing() {
        let target = DropTarget::new();
        assert_eq!(target.pick(None::<PathBuf>), None);
        assert_eq!(target.pick(Some("ct.dcm")), Some(PathBuf::from("ct.dcm")));
    }
}
