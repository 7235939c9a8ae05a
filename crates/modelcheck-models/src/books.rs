use chrono::Datelike;
use modelcheck_core::{FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use modelcheck_validate::{FieldValidator, Rejection, ValidationContext, ValidatorRegistry};
use serde::Serialize;

use crate::model::Model;

/// Book with normalised author and title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub pages: i64,
    pub isbn: String,
    pub published_year: i64,
}

impl Model for Book {
    const NAME: &'static str = "book";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Book with custom title and author rules")
            .field(FieldSpec::new("title", FieldType::Text).min_length(1).max_length(200))
            .field(FieldSpec::new("author", FieldType::Text).min_length(1).max_length(100))
            .field(
                FieldSpec::new("pages", FieldType::Int)
                    .gt(0)
                    .describe("page count, must be positive"),
            )
            .field(
                FieldSpec::new("isbn", FieldType::Text)
                    .pattern(r"^\d{10}(\d{3})?$")?
                    .describe("10 or 13 digit ISBN"),
            )
            .field(FieldSpec::new("published_year", FieldType::Int).ge(1000))
            .build()
    }

    fn register(registry: &mut ValidatorRegistry) {
        registry.register_field(Self::NAME, "author", Box::new(AuthorName));
        registry.register_field(Self::NAME, "title", Box::new(TitleCase));
        registry.register_field(Self::NAME, "published_year", Box::new(NotInFuture));
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            title: record.text("title")?.to_string(),
            author: record.text("author")?.to_string(),
            pages: record.int("pages")?,
            isbn: record.text("isbn")?.to_string(),
            published_year: record.int("published_year")?,
        })
    }
}

struct AuthorName;

impl FieldValidator for AuthorName {
    fn id(&self) -> &'static str {
        "book.author"
    }

    fn apply(&self, value: Value, _ctx: &ValidationContext) -> std::result::Result<Value, Rejection> {
        match value {
            Value::Text(author) if author.chars().any(char::is_numeric) => {
                Err(Rejection::new("author name cannot contain digits"))
            }
            Value::Text(author) => Ok(Value::Text(title_case(author.trim()))),
            other => Ok(other),
        }
    }
}

struct TitleCase;

impl FieldValidator for TitleCase {
    fn id(&self) -> &'static str {
        "book.title"
    }

    fn apply(&self, value: Value, _ctx: &ValidationContext) -> std::result::Result<Value, Rejection> {
        match value {
            Value::Text(title) if is_all_uppercase(&title) && title.chars().count() > 5 => {
                Err(Rejection::new("title should not be all uppercase"))
            }
            Value::Text(title) => Ok(Value::Text(title.trim().to_string())),
            other => Ok(other),
        }
    }
}

struct NotInFuture;

impl FieldValidator for NotInFuture {
    fn id(&self) -> &'static str {
        "book.published_year"
    }

    fn apply(&self, value: Value, ctx: &ValidationContext) -> std::result::Result<Value, Rejection> {
        let current_year = i64::from(ctx.now.year());
        match value.as_int() {
            Some(year) if year > current_year => Err(Rejection::new(format!(
                "published year cannot be later than {current_year}"
            ))),
            _ => Ok(value),
        }
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// True when the text has cased letters and none of them is lowercase.
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for ch in text.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
