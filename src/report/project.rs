use crate::config::{ColumnSpec, Derivation};
use crate::error::{Error, Result};
use crate::model::{DisplayRow, Record};

/// Record fields a column may draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    MemberNumber,
    FullName,
    Collector,
    Email,
    Phone,
    Address,
    Town,
    Postcode,
    Status,
    MembershipType,
}

impl RecordField {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "member_number" => Self::MemberNumber,
            "full_name" => Self::FullName,
            "collector" => Self::Collector,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "address" => Self::Address,
            "town" => Self::Town,
            "postcode" => Self::Postcode,
            "status" => Self::Status,
            "membership_type" => Self::MembershipType,
            _ => return None,
        })
    }

    /// The field's value, trimmed; blank counts as absent.
    pub fn value(self, record: &Record) -> Option<&str> {
        let raw = match self {
            Self::MemberNumber => record.member_number.as_deref(),
            Self::FullName => Some(record.full_name.as_str()),
            Self::Collector => record.collector.as_deref(),
            Self::Email => record.email.as_deref(),
            Self::Phone => record.phone.as_deref(),
            Self::Address => record.address.as_deref(),
            Self::Town => record.town.as_deref(),
            Self::Postcode => record.postcode.as_deref(),
            Self::Status => record.status.as_deref(),
            Self::MembershipType => record.membership_type.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    Field(RecordField),
    Join {
        fields: Vec<RecordField>,
        separator: String,
    },
}

/// A column whose derivation has been checked against the record fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub key: String,
    pub header: String,
    pub rule: Rule,
    pub weight: f32,
}

fn resolve_field(column: &ColumnSpec, name: &str) -> Result<RecordField> {
    RecordField::from_name(name).ok_or_else(|| {
        Error::Config(format!(
            "column '{}' references unknown field '{}'",
            column.key, name
        ))
    })
}

pub fn resolve_columns(specs: &[ColumnSpec]) -> Result<Vec<Column>> {
    if specs.is_empty() {
        return Err(Error::Config("at least one column is required".into()));
    }
    specs
        .iter()
        .map(|spec| {
            let rule = match &spec.rule {
                Derivation::Field { field } => Rule::Field(resolve_field(spec, field)?),
                Derivation::Join { fields, separator } => {
                    if fields.is_empty() {
                        return Err(Error::Config(format!(
                            "column '{}' joins no fields",
                            spec.key
                        )));
                    }
                    Rule::Join {
                        fields: fields
                            .iter()
                            .map(|f| resolve_field(spec, f))
                            .collect::<Result<_>>()?,
                        separator: separator.clone(),
                    }
                }
            };
            Ok(Column {
                key: spec.key.clone(),
                header: spec.header.clone(),
                rule,
                weight: spec.weight,
            })
        })
        .collect()
}

pub fn header_row(columns: &[Column]) -> DisplayRow {
    DisplayRow(columns.iter().map(|c| c.header.clone()).collect())
}

fn derive(record: &Record, rule: &Rule) -> Option<String> {
    match rule {
        Rule::Field(field) => field.value(record).map(str::to_string),
        Rule::Join { fields, separator } => {
            let parts: Vec<&str> = fields.iter().filter_map(|f| f.value(record)).collect();
            (!parts.is_empty()).then(|| parts.join(separator))
        }
    }
}

/// One display value per column; anything that derives to nothing becomes
/// `fallback`.
pub fn project_row(record: &Record, columns: &[Column], fallback: &str) -> DisplayRow {
    DisplayRow(
        columns
            .iter()
            .map(|c| derive(record, &c.rule).unwrap_or_else(|| fallback.to_string()))
            .collect(),
    )
}
