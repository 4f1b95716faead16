//! Aggregate query construction for the sighting store.
//!
//! All three query shapes share one predicate writer. With no species
//! filter the `WHERE` clause is omitted entirely; otherwise the predicate is
//! pushed into the store with bound parameters (`$1`, `$2`, ...). Values are
//! never interpolated into the SQL text.

/// Table holding one row per sighting.
pub const TABLE_NAME: &str = "species_sightings";

/// Species selection applied inside the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeciesFilter {
    /// No predicate.
    #[default]
    All,
    /// `species_name = $n`
    Exact(String),
    /// `species_name IN ($n, ...)`. An empty list matches nothing.
    AnyOf(Vec<String>),
}

impl SpeciesFilter {
    /// Filter for a multi-select. Selecting nothing, or every known species,
    /// means no filter at all.
    pub fn from_selection(selected: &[String], all_species: &[String]) -> Self {
        if selected.is_empty() || selected.len() >= all_species.len() {
            SpeciesFilter::All
        } else {
            SpeciesFilter::AnyOf(selected.to_vec())
        }
    }

    pub fn is_filtering(&self) -> bool {
        !matches!(self, SpeciesFilter::All)
    }

    /// Evaluate the predicate locally. Used only by the in-memory store.
    pub fn matches(&self, species: &str) -> bool {
        match self {
            SpeciesFilter::All => true,
            SpeciesFilter::Exact(name) => name == species,
            SpeciesFilter::AnyOf(names) => names.iter().any(|n| n == species),
        }
    }
}

/// Per-cell aggregate query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellQuery {
    pub filter: SpeciesFilter,
    /// Include `MIN(day_of_year)`.
    pub min_day: bool,
    /// Include the record count of this species per cell, and keep only
    /// cells where it is non-zero.
    pub count_species: Option<String>,
}

impl CellQuery {
    pub fn new(filter: SpeciesFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn with_min_day(mut self) -> Self {
        self.min_day = true;
        self
    }

    pub fn with_species_count(mut self, species: impl Into<String>) -> Self {
        self.count_species = Some(species.into());
        self
    }

    pub fn build(&self) -> BuiltQuery {
        let mut q = SqlBuilder::new();
        q.push(
            "SELECT latitude, longitude, COUNT(*) AS count, \
             array_agg(DISTINCT species_name) AS species, \
             MIN(time) AS earliest, MAX(time) AS latest",
        );

        if self.min_day {
            q.push(", MIN(day_of_year) AS min_day");
        }

        let species_param = self.count_species.as_ref().map(|s| q.bind(s));
        if let Some(param) = &species_param {
            q.push(&format!(
                ", COUNT(*) FILTER (WHERE species_name = {}) AS species_count",
                param
            ));
        }

        q.push(&format!(" FROM {}", TABLE_NAME));
        q.push_filter(&self.filter);
        q.push(" GROUP BY latitude, longitude");

        if let Some(param) = &species_param {
            q.push(&format!(
                " HAVING COUNT(*) FILTER (WHERE species_name = {}) > 0",
                param
            ));
        }

        q.push(" ORDER BY latitude, longitude");
        q.finish()
    }
}

/// Record counts per Monday-keyed week.
pub fn weekly_counts(filter: &SpeciesFilter) -> BuiltQuery {
    let mut q = SqlBuilder::new();
    q.push(&format!(
        "SELECT CAST(date_trunc('week', time) AS DATE) AS week, COUNT(*) AS count FROM {}",
        TABLE_NAME
    ));
    q.push_filter(filter);
    q.push(" GROUP BY week ORDER BY week");
    q.finish()
}

/// Record counts per distinct (cell, day-of-year), ordered by day.
pub fn day_cells(filter: &SpeciesFilter) -> BuiltQuery {
    let mut q = SqlBuilder::new();
    q.push(&format!(
        "SELECT latitude, longitude, day_of_year, COUNT(*) AS count FROM {}",
        TABLE_NAME
    ));
    q.push_filter(filter);
    q.push(
        " GROUP BY latitude, longitude, day_of_year \
         ORDER BY day_of_year, latitude, longitude",
    );
    q.finish()
}

/// Every species name in the store, alphabetically.
pub fn distinct_species() -> BuiltQuery {
    BuiltQuery {
        sql: format!(
            "SELECT DISTINCT species_name FROM {} ORDER BY species_name",
            TABLE_NAME
        ),
        binds: Vec::new(),
    }
}

/// Record count per species.
pub fn species_counts() -> BuiltQuery {
    BuiltQuery {
        sql: format!(
            "SELECT species_name, COUNT(*) AS count FROM {} GROUP BY species_name",
            TABLE_NAME
        ),
        binds: Vec::new(),
    }
}

/// SQL text plus positional bind values, in `$n` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Vec<String>,
}

struct SqlBuilder {
    sql: String,
    binds: Vec<String>,
}

impl SqlBuilder {
    fn new() -> Self {
        Self {
            sql: String::new(),
            binds: Vec::new(),
        }
    }

    fn push(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// Register a bind value and return its placeholder.
    fn bind(&mut self, value: &str) -> String {
        self.binds.push(value.to_string());
        format!("${}", self.binds.len())
    }

    fn push_filter(&mut self, filter: &SpeciesFilter) {
        match filter {
            SpeciesFilter::All => {}
            SpeciesFilter::Exact(name) => {
                let param = self.bind(name);
                self.push(&format!(" WHERE species_name = {}", param));
            }
            SpeciesFilter::AnyOf(names) if names.is_empty() => {
                self.push(" WHERE FALSE");
            }
            SpeciesFilter::AnyOf(names) => {
                let placeholders: Vec<String> = names.iter().map(|n| self.bind(n)).collect();
                self.push(&format!(
                    " WHERE species_name IN ({})",
                    placeholders.join(", ")
                ));
            }
        }
    }

    fn finish(self) -> BuiltQuery {
        BuiltQuery {
            sql: self.sql,
            binds: self.binds,
        }
    }
}
