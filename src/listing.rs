//! Sort keys and in-memory filtering for list pages.
//!
//! A sort key travels in the query string as a column name, optionally with a
//! `_desc` suffix (`company`, `company_desc`, `unit_price_desc`, ...). Unknown
//! keys fall back to the column's default in ascending order.

use std::cmp::Ordering;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};

use crate::entities::customer;

const DESC_SUFFIX: &str = "_desc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C> SortKey<C>
where
    C: Copy + PartialEq + Default + FromStr + AsRef<str>,
{
    pub fn ascending(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Descending,
        }
    }

    /// Parses `column` or `column_desc`; `None` for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.strip_suffix(DESC_SUFFIX) {
            Some(base) => base.parse().ok().map(Self::descending),
            None => raw.parse().ok().map(Self::ascending),
        }
    }

    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse)
            .unwrap_or_else(|| Self::ascending(C::default()))
    }

    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Descending
    }

    /// The query-string form of this key.
    pub fn as_param(&self) -> String {
        match self.direction {
            SortDirection::Ascending => self.column.as_ref().to_string(),
            SortDirection::Descending => format!("{}{}", self.column.as_ref(), DESC_SUFFIX),
        }
    }

    /// Sort parameter for the header link of `column` while `self` is active:
    /// the ascending key when the list is currently sorted by `column`
    /// descending, otherwise the descending key.
    pub fn header_param(&self, column: C) -> String {
        let next = if self.column == column && self.is_descending() {
            Self::ascending(column)
        } else {
            Self::descending(column)
        };
        next.as_param()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum CustomerSortColumn {
    #[default]
    Company,
    Contact,
    Address,
    Phone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ProductSortColumn {
    Category,
    Supplier,
    #[default]
    Product,
    UnitPrice,
    UnitInStock,
}

pub type CustomerSortKey = SortKey<CustomerSortColumn>;
pub type ProductSortKey = SortKey<ProductSortColumn>;

fn sort_field(customer: &customer::Model, column: CustomerSortColumn) -> Option<&str> {
    match column {
        CustomerSortColumn::Company => Some(customer.company_name.as_str()),
        CustomerSortColumn::Contact => customer.contact_name.as_deref(),
        CustomerSortColumn::Address => customer.address.as_deref(),
        CustomerSortColumn::Phone => customer.phone.as_deref(),
    }
}

fn matches_term(customer: &customer::Model, term: &str) -> bool {
    [
        Some(customer.company_name.as_str()),
        customer.contact_name.as_deref(),
        customer.address.as_deref(),
        customer.phone.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.contains(term))
}

/// Keeps customers whose company, contact, address or phone contains `term`.
///
/// Matching is an ordinal, case-sensitive substring test. An empty or absent
/// term keeps everything.
pub fn filter_customers(
    customers: Vec<customer::Model>,
    term: Option<&str>,
) -> Vec<customer::Model> {
    match term {
        Some(term) if !term.is_empty() => customers
            .into_iter()
            .filter(|c| matches_term(c, term))
            .collect(),
        _ => customers,
    }
}

/// Stable sort by one column. Missing values order before present ones.
pub fn sort_customers(customers: &mut [customer::Model], key: CustomerSortKey) {
    customers.sort_by(|a, b| {
        let ordering: Ordering = sort_field(a, key.column).cmp(&sort_field(b, key.column));
        match key.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

/// Filter then sort, returning the effective sort key for the page header.
pub fn filter_and_sort(
    customers: Vec<customer::Model>,
    term: Option<&str>,
    sort_order: Option<&str>,
) -> (Vec<customer::Model>, CustomerSortKey) {
    let key = CustomerSortKey::parse_or_default(sort_order);
    let mut customers = filter_customers(customers, term);
    sort_customers(&mut customers, key);
    (customers, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn customer(id: &str, company: &str, contact: Option<&str>, phone: Option<&str>) -> customer::Model {
        customer::Model {
            customer_id: id.into(),
            company_name: company.into(),
            contact_name: contact.map(Into::into),
            contact_title: None,
            address: None,
            city: None,
            region: None,
            postal_code: None,
            country: None,
            phone: phone.map(Into::into),
            fax: None,
        }
    }

    fn sample() -> Vec<customer::Model> {
        vec![
            customer("BERGS", "Berglunds snabbköp", Some("Christina Berglund"), Some("0921-12 34 65")),
            customer("ALFKI", "Alfreds Futterkiste", Some("Maria Anders"), Some("030-0074321")),
            customer("ANATR", "Ana Trujillo Emparedados", None, Some("(5) 555-4729")),
        ]
    }

    fn ids(customers: &[customer::Model]) -> Vec<&str> {
        customers.iter().map(|c| c.customer_id.as_str()).collect()
    }

    #[rstest]
    #[case("company", CustomerSortColumn::Company, SortDirection::Ascending)]
    #[case("company_desc", CustomerSortColumn::Company, SortDirection::Descending)]
    #[case("contact_desc", CustomerSortColumn::Contact, SortDirection::Descending)]
    #[case("phone", CustomerSortColumn::Phone, SortDirection::Ascending)]
    fn parses_known_keys(
        #[case] raw: &str,
        #[case] column: CustomerSortColumn,
        #[case] direction: SortDirection,
    ) {
        let key = CustomerSortKey::parse(raw).unwrap();
        assert_eq!(key.column, column);
        assert_eq!(key.direction, direction);
        assert_eq!(key.as_param(), raw);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Company"))]
    #[case(Some("name_desc"))]
    #[case(Some("_desc"))]
    fn unknown_keys_fall_back_to_company_ascending(#[case] raw: Option<&str>) {
        let key = CustomerSortKey::parse_or_default(raw);
        assert_eq!(key, CustomerSortKey::ascending(CustomerSortColumn::Company));
    }

    #[test]
    fn product_keys_use_snake_case_names() {
        let key = ProductSortKey::parse("unit_in_stock_desc").unwrap();
        assert_eq!(key.column, ProductSortColumn::UnitInStock);
        assert!(key.is_descending());
        assert_eq!(
            ProductSortKey::parse_or_default(None),
            ProductSortKey::ascending(ProductSortColumn::Product)
        );
    }

    #[test]
    fn header_link_toggles_only_the_active_descending_column() {
        let current = CustomerSortKey::descending(CustomerSortColumn::Contact);
        assert_eq!(current.header_param(CustomerSortColumn::Contact), "contact");
        assert_eq!(current.header_param(CustomerSortColumn::Company), "company_desc");

        let current = CustomerSortKey::ascending(CustomerSortColumn::Contact);
        assert_eq!(current.header_param(CustomerSortColumn::Contact), "contact_desc");
    }

    #[test]
    fn filter_is_case_sensitive_and_skips_missing_fields() {
        let hits = filter_customers(sample(), Some("Ana"));
        assert_eq!(ids(&hits), vec!["ANATR"]);

        let hits = filter_customers(sample(), Some("ana"));
        assert!(hits.is_empty());

        let hits = filter_customers(sample(), Some("555"));
        assert_eq!(ids(&hits), vec!["ANATR"]);
    }

    #[test]
    fn empty_term_keeps_everything() {
        assert_eq!(filter_customers(sample(), Some("")).len(), 3);
        assert_eq!(filter_customers(sample(), None).len(), 3);
    }

    #[test]
    fn default_order_is_company_ascending() {
        let (sorted, key) = filter_and_sort(sample(), None, None);
        assert_eq!(key.as_param(), "company");
        assert_eq!(ids(&sorted), vec!["ALFKI", "ANATR", "BERGS"]);
    }

    #[test]
    fn missing_values_sort_first_and_last_when_descending() {
        let (sorted, _) = filter_and_sort(sample(), None, Some("contact"));
        assert_eq!(ids(&sorted), vec!["ANATR", "BERGS", "ALFKI"]);

        let (sorted, _) = filter_and_sort(sample(), None, Some("contact_desc"));
        assert_eq!(ids(&sorted), vec!["ALFKI", "BERGS", "ANATR"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let customers = vec![
            customer("AAAAA", "Same", None, None),
            customer("BBBBB", "Same", None, None),
            customer("CCCCC", "Other", None, None),
        ];
        let (asc, _) = filter_and_sort(customers.clone(), None, Some("company"));
        assert_eq!(ids(&asc), vec!["CCCCC", "AAAAA", "BBBBB"]);

        let (desc, _) = filter_and_sort(customers, None, Some("company_desc"));
        assert_eq!(ids(&desc), vec!["AAAAA", "BBBBB", "CCCCC"]);
    }
}
