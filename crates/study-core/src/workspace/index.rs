//! Pointer arithmetic for keeping an index attached to the same logical
//! entry while the sequence around it changes.

/// Where `index` lands after the entry at `from` is moved to `to`.
pub fn remap_after_move(index: usize, from: usize, to: usize) -> usize {
    if index == from {
        to
    } else if from < index && index <= to {
        index - 1
    } else if to <= index && index < from {
        index + 1
    } else {
        index
    }
}

/// Where `index` lands after `removed` is taken out, `None` if it was the
/// removed entry itself.
pub fn shift_after_removal(index: usize, removed: usize) -> Option<usize> {
    match index.cmp(&removed) {
        std::cmp::Ordering::Less => Some(index),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(index - 1),
    }
}

/// Where `index` lands after a new entry is inserted at `at`.
pub fn shift_after_insert(index: usize, at: usize) -> usize {
    if index >= at {
        index + 1
    } else {
        index
    }
}

/// Repairs a pointer after only the entries with `kept[i] == true` survive.
///
/// A surviving entry keeps pointing at itself. A removed entry hands the
/// pointer to whatever now occupies its position, or to the new last entry
/// when that position is past the end. Returns `None` when nothing survives.
pub fn repair_after_retain(index: usize, kept: &[bool]) -> Option<usize> {
    let survivors = kept.iter().filter(|&&k| k).count();
    if survivors == 0 {
        return None;
    }
    let before = kept.iter().take(index).filter(|&&k| k).count();
    if kept.get(index).copied().unwrap_or(false) {
        Some(before)
    } else {
        Some(before.min(survivors - 1))
    }
}

/// Number of entries in the sorted slice `removed` strictly before `index`.
pub fn count_before(removed: &[usize], index: usize) -> usize {
    removed.iter().take_while(|&&r| r < index).count()
}
