#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

use crate::RowId;

#[cfg(feature = "std")]
pub(crate) type RowMap<V> = HashMap<RowId, V>;
#[cfg(not(feature = "std"))]
pub(crate) type RowMap<V> = BTreeMap<RowId, V>;

#[cfg(feature = "std")]
pub(crate) type RowSet = HashSet<RowId>;
#[cfg(not(feature = "std"))]
pub(crate) type RowSet = BTreeSet<RowId>;
