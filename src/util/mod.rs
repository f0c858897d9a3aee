//! Field-level building blocks shared by every format and namespace.
//!
//! - **Coercion**: string/number/boolean extraction from untyped tree values
//! - **Cardinality**: treating "one element" and "many elements" alike
//! - **Dates**: multi-encoding parsing and canonical generation
//! - **Generation**: the CDATA-or-plain decision and other field emitters
//! - **Text**: entity decoding and CDATA unwrapping
//!
//! # Examples
//!
//! ```
//! use feedcraft::tree::Value;
//! use feedcraft::util::{parse_array_of, parse_string};
//!
//! let one = Value::from("a");
//! let many = Value::List(vec![Value::from("a")]);
//! assert_eq!(
//!     parse_array_of(Some(&one), parse_string),
//!     parse_array_of(Some(&many), parse_string),
//! );
//! ```

mod cardinality;
mod coerce;
mod date;
mod generate;
mod text;

pub use cardinality::{parse_array_of, parse_array_of_limited, parse_singular_of};
pub use coerce::{
    detect_namespaces, parse_boolean, parse_csv_of, parse_number, parse_string,
    parse_text_number, parse_text_string, parse_yes_no_boolean, retrieve_text, trim_array,
    trim_object,
};
pub use date::{
    generate_rfc3339_date, generate_rfc822_date, parse_date, parse_date_value, DateLike,
};
pub use generate::{
    generate_array_of, generate_boolean, generate_cdata_string, generate_csv_of,
    generate_namespace_attrs, generate_number, generate_plain_string,
    generate_text_or_cdata_string, generate_yes_no_boolean,
};
pub use text::{decode_entities, decode_text};
