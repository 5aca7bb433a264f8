use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `None` when the snapshot cell was empty
    Category(Option<String>),
    /// NaN / ±inf are preserved as read; imputation happens in preprocessing
    Number(f64),
}

/// One snapshot row: customer id plus the declared categorical and numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    customer_id: String,
    fields: HashMap<String, FieldValue>,
}

impl CustomerRecord {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_category(mut self, column: impl Into<String>, value: Option<&str>) -> Self {
        self.set(column, FieldValue::Category(value.map(String::from)));
        self
    }

    pub fn with_number(mut self, column: impl Into<String>, value: f64) -> Self {
        self.set(column, FieldValue::Number(value));
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: FieldValue) {
        self.fields.insert(column.into(), value);
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }
}
