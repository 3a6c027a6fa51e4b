//! Sequence addressing: signed single indices and stepped slices

use super::KeyListError;

/// A `start:stop:step` range over a sequence.
///
/// Bounds default to the ends of the sequence, negative bounds count from the
/// end, and out-of-range bounds are clipped rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// Everything
    pub fn full() -> Self {
        Self::default()
    }

    /// `start:`
    pub fn starting(start: isize) -> Self {
        Self::new(Some(start), None, None)
    }

    /// `:stop`
    pub fn until(stop: isize) -> Self {
        Self::new(None, Some(stop), None)
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against a sequence length into clipped `(start, stop, step)`
    pub fn resolve(&self, len: usize) -> Result<(isize, isize, isize), KeyListError> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(KeyListError::ZeroSliceStep);
        }

        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clip = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match self.start {
            Some(start) => clip(start),
            None if step > 0 => lower,
            None => upper,
        };
        let stop = match self.stop {
            Some(stop) => clip(stop),
            None if step > 0 => upper,
            None => lower,
        };

        Ok((start, stop, step))
    }

    /// Positions selected by this slice, in traversal order
    pub fn positions(&self, len: usize) -> Result<Vec<usize>, KeyListError> {
        let (start, stop, step) = self.resolve(len)?;
        let mut positions = Vec::new();
        let mut i = start;

        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            positions.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }

        Ok(positions)
    }

    /// Whether this is a plain contiguous slice (step 1)
    pub fn is_contiguous(&self) -> bool {
        self.step.unwrap_or(1) == 1
    }
}

/// How an authorized key list is addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIndex {
    At(isize),
    Slice(Slice),
}

impl KeyIndex {
    /// Parse textual addressing: `3`, `-1`, `2:`, `:-2`, `::2`, `1:5:2`.
    ///
    /// Anything that is neither an integer nor a slice is rejected with
    /// [`KeyListError::InvalidIndex`].
    pub fn parse(text: &str) -> Result<Self, KeyListError> {
        let text = text.trim();
        let invalid = || KeyListError::InvalidIndex(text.to_string());

        if !text.contains(':') {
            return text.parse().map(Self::At).map_err(|_| invalid());
        }

        let parts: Vec<&str> = text.split(':').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let bound = |part: Option<&&str>| -> Result<Option<isize>, KeyListError> {
            match part.map(|p| p.trim()) {
                None | Some("") => Ok(None),
                Some(p) => p.parse().map(Some).map_err(|_| invalid()),
            }
        };

        Ok(Self::Slice(Slice::new(
            bound(parts.first())?,
            bound(parts.get(1))?,
            bound(parts.get(2))?,
        )))
    }

    /// Resolve a single signed index against a sequence length
    pub fn resolve_single(index: isize, len: usize) -> Result<usize, KeyListError> {
        let resolved = if index < 0 {
            index + len as isize
        } else {
            index
        };

        if resolved < 0 || resolved >= len as isize {
            return Err(KeyListError::IndexOutOfRange { index, len });
        }

        Ok(resolved as usize)
    }
}

impl From<isize> for KeyIndex {
    fn from(index: isize) -> Self {
        Self::At(index)
    }
}

impl From<Slice> for KeyIndex {
    fn from(slice: Slice) -> Self {
        Self::Slice(slice)
    }
}
