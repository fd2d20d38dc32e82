use serde::Deserialize;

/// Recognized input columns. Any other header in the file is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    BillingCode,
    BillingClass,
    NegotiatedType,
    NegotiatedRate,
    City,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::BillingCode,
        Column::BillingClass,
        Column::NegotiatedType,
        Column::NegotiatedRate,
        Column::City,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::BillingCode => "billing_code",
            Column::BillingClass => "billing_class",
            Column::NegotiatedType => "negotiated_type",
            Column::NegotiatedRate => "negotiated_rate",
            Column::City => "city",
        }
    }
}

/// Which recognized columns the input file carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    present: Vec<Column>,
}

impl Schema {
    pub fn new(columns: &[Column]) -> Self {
        let mut present = Vec::new();
        for c in Column::ALL {
            if columns.contains(&c) {
                present.push(c);
            }
        }
        Schema { present }
    }

    pub fn from_headers<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<&str> = headers.into_iter().collect();
        let columns: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|c| names.contains(&c.header()))
            .collect();
        Schema::new(&columns)
    }

    pub fn has(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    pub fn columns(&self) -> &[Column] {
        &self.present
    }
}

/// One CSV row as read from disk. Absent columns deserialize to `None`.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub billing_code: Option<String>,
    #[serde(default)]
    pub billing_class: Option<String>,
    #[serde(default)]
    pub negotiated_type: Option<String>,
    #[serde(default)]
    pub negotiated_rate: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

/// One provider row. Categorical fields are `None` only when the column is
/// absent from the schema; `negotiated_rate` is `None` whenever the cell is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub billing_code: Option<String>,
    pub billing_class: Option<String>,
    pub negotiated_type: Option<String>,
    pub negotiated_rate: Option<f64>,
    pub city: Option<String>,
}

impl Record {
    pub fn category(&self, column: Column) -> Option<&str> {
        match column {
            Column::BillingCode => self.billing_code.as_deref(),
            Column::BillingClass => self.billing_class.as_deref(),
            Column::NegotiatedType => self.negotiated_type.as_deref(),
            Column::City => self.city.as_deref(),
            Column::NegotiatedRate => None,
        }
    }
}

/// Immutable, ordered input to every aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    /// Fields of columns the schema lacks are cleared, so a record never
    /// carries data for an absent column.
    pub fn new(schema: Schema, mut records: Vec<Record>) -> Self {
        for r in &mut records {
            if !schema.has(Column::BillingCode) {
                r.billing_code = None;
            }
            if !schema.has(Column::BillingClass) {
                r.billing_class = None;
            }
            if !schema.has(Column::NegotiatedType) {
                r.negotiated_type = None;
            }
            if !schema.has(Column::NegotiatedRate) {
                r.negotiated_rate = None;
            }
            if !schema.has(Column::City) {
                r.city = None;
            }
        }
        Dataset { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn has(&self, column: Column) -> bool {
        self.schema.has(column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rate cells in record order, missing entries included.
    pub fn rates(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.records.iter().map(|r| r.negotiated_rate)
    }

    pub fn billing_code(&self) -> Option<&str> {
        if !self.has(Column::BillingCode) {
            return None;
        }
        self.records.first().and_then(|r| r.billing_code.as_deref())
    }
}
