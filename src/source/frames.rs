use std::iter::FusedIterator;

use crate::foundation::core::Raster;
use crate::foundation::error::{ExportError, ExportResult};
use crate::render::backend::LoadedDocument;

/// Lazy, forward-only sequence of every frame of a document, in index order.
///
/// Each call to `next` renders one raster at the canvas size captured when the sequence was
/// created. Call [`crate::Animation::iter_frames`] again to restart.
#[derive(Debug)]
pub struct Frames<'a, D> {
    doc: &'a D,
    width: u32,
    height: u32,
    next: u32,
    total: u32,
}

impl<'a, D: LoadedDocument> Frames<'a, D> {
    pub(crate) fn new(doc: &'a D) -> ExportResult<Self> {
        let total = doc.total_frames();
        if total == 0 {
            return Err(ExportError::EmptySequence);
        }
        let (width, height) = (doc.width(), doc.height());
        if width == 0 || height == 0 {
            return Err(ExportError::NotLoaded);
        }
        Ok(Self {
            doc,
            width,
            height,
            next: 0,
            total,
        })
    }

    /// Index of the frame the next call to `next` will render.
    pub fn position(&self) -> u32 {
        self.next
    }
}

impl<D: LoadedDocument> Iterator for Frames<'_, D> {
    type Item = ExportResult<Raster>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.doc.render_rgba(index, self.width, self.height))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl<D: LoadedDocument> ExactSizeIterator for Frames<'_, D> {}

impl<D: LoadedDocument> FusedIterator for Frames<'_, D> {}
