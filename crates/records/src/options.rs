//! Options for find, save, reload and batch iteration

/// Which families an operation touches beyond the always-loaded default
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FamilySelection {
    /// The named families, on top of `"default"`
    Requested(Vec<String>),
    /// Every family registered on the schema
    All,
}

impl Default for FamilySelection {
    fn default() -> Self {
        FamilySelection::Requested(Vec::new())
    }
}

impl FamilySelection {
    /// Select the named families
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FamilySelection::Requested(names.into_iter().map(Into::into).collect())
    }

    /// Select every registered family
    pub fn all() -> Self {
        FamilySelection::All
    }
}

/// Options for `find` and `find_many`
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Families to fetch alongside `"default"`
    pub families: FamilySelection,
}

impl FindOptions {
    /// Fetch only the default family
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the named families too
    pub fn with_families<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: FamilySelection::named(names),
        }
    }

    /// Fetch every registered family
    pub fn with_all_families() -> Self {
        Self {
            families: FamilySelection::All,
        }
    }
}

/// Options for `save`
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Families to write on top of the loaded set
    pub families: FamilySelection,
}

impl SaveOptions {
    /// Write the loaded families
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the named families too
    pub fn with_families<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            families: FamilySelection::named(names),
        }
    }

    /// Write every registered family
    pub fn with_all_families() -> Self {
        Self {
            families: FamilySelection::All,
        }
    }
}

/// Options for `find_each` batch iteration
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How many records to hydrate per `fetch_many` round-trip
    pub batch_size: usize,
    /// Families to fetch for each batch
    pub families: FamilySelection,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            families: FamilySelection::default(),
        }
    }
}

impl ScanOptions {
    /// Default batch size (1000), default family only
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the batch size
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Fetch the named families for each record
    pub fn families<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.families = FamilySelection::named(names);
        self
    }
}
