//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Sibling counters for separator and indentation decisions.

use crate::error::{CodecError, Result};

/// A stack of sibling counters, one per open container.
///
/// The stack starts with a single entry for the implicit top level and never
/// drops below it: the top counter says how many values have already been
/// written at the current level (so whether a separator is due), and the
/// stack depth gives the indentation level.
///
/// # Examples
///
/// ```rust
/// use fieldcodec::codec::NestingTracker;
///
/// let mut nesting = NestingTracker::new();
/// nesting.push();
/// assert!(!nesting.next_sibling()); // first value, no separator
/// assert!(nesting.next_sibling()); // second value, separator due
/// assert_eq!(nesting.depth(), 1);
/// nesting.pop()?;
/// assert!(nesting.pop().is_err());
/// # Ok::<(), fieldcodec::CodecError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NestingTracker {
    counters: Vec<u32>,
}

impl NestingTracker {
    /// Creates a tracker holding only the top-level counter.
    #[must_use]
    pub fn new() -> Self {
        Self { counters: vec![0] }
    }

    /// Opens a container.
    pub fn push(&mut self) {
        self.counters.push(0);
    }

    /// Closes the innermost container.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidStructure`] if no container is open.
    pub fn pop(&mut self) -> Result<()> {
        if self.counters.len() <= 1 {
            return Err(CodecError::structure(
                "container closed without a matching open",
            ));
        }
        self.counters.pop();
        Ok(())
    }

    /// Records one more value at the current level.
    ///
    /// Returns `true` if values were already written at this level, meaning a
    /// separator must precede the new one.
    pub fn next_sibling(&mut self) -> bool {
        match self.counters.last_mut() {
            Some(count) => {
                let had_siblings = *count > 0;
                *count += 1;
                had_siblings
            }
            None => false,
        }
    }

    /// Returns `true` if the current level already holds values.
    #[must_use]
    pub fn has_siblings(&self) -> bool {
        self.counters.last().is_some_and(|&count| count > 0)
    }

    /// Number of open containers, which is the indentation depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.counters.len() - 1
    }
}

impl Default for NestingTracker {
    fn default() -> Self {
        Self::new()
    }
}
