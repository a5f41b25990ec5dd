// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

/// The semantics of a field, as named by the server's `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    DateTime,
    Boolean,
    Monetary,
    Integer,
    Selection,
    ShortText,
    LongText,
    Float,
    ManyToMany,
    ManyToOne,
    OneToMany,
    Binary,
    Date,
    Html,
    Reference,
    ManyToOneReference,
}

impl FieldKind {
    pub const ALL: [FieldKind; 16] = [
        FieldKind::DateTime,
        FieldKind::Boolean,
        FieldKind::Monetary,
        FieldKind::Integer,
        FieldKind::Selection,
        FieldKind::ShortText,
        FieldKind::LongText,
        FieldKind::Float,
        FieldKind::ManyToMany,
        FieldKind::ManyToOne,
        FieldKind::OneToMany,
        FieldKind::Binary,
        FieldKind::Date,
        FieldKind::Html,
        FieldKind::Reference,
        FieldKind::ManyToOneReference,
    ];

    /// The name the server uses for this kind.
    pub fn type_name(self) -> &'static str {
        match self {
            FieldKind::DateTime => "datetime",
            FieldKind::Boolean => "boolean",
            FieldKind::Monetary => "monetary",
            FieldKind::Integer => "integer",
            FieldKind::Selection => "selection",
            FieldKind::ShortText => "char",
            FieldKind::LongText => "text",
            FieldKind::Float => "float",
            FieldKind::ManyToMany => "many2many",
            FieldKind::ManyToOne => "many2one",
            FieldKind::OneToMany => "one2many",
            FieldKind::Binary => "binary",
            FieldKind::Date => "date",
            FieldKind::Html => "html",
            FieldKind::Reference => "reference",
            FieldKind::ManyToOneReference => "many2one_reference",
        }
    }

    /// Case-insensitive lookup by server type name.
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.type_name().eq_ignore_ascii_case(type_name))
    }

    /// Kinds whose values point at records of another model (named by `relation`).
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            FieldKind::ManyToMany | FieldKind::ManyToOne | FieldKind::OneToMany
        )
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_round_trips_through_its_type_name() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_type_name(kind.type_name()), Some(kind));
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(
            FieldKind::from_type_name("Many2One"),
            Some(FieldKind::ManyToOne)
        );
        assert_eq!(FieldKind::from_type_name("CHAR"), Some(FieldKind::ShortText));
        assert_eq!(FieldKind::from_type_name("properties"), None);
    }

    #[test]
    fn relational_kinds() {
        let relational: Vec<_> = FieldKind::ALL
            .into_iter()
            .filter(|kind| kind.is_relational())
            .collect();

        assert_eq!(
            relational,
            vec![
                FieldKind::ManyToMany,
                FieldKind::ManyToOne,
                FieldKind::OneToMany
            ]
        );
    }
}
