//! RuleReference - ルール参照文字列のパース
//!
//! `Type.method` / `Outer$Inner.method` / `method` の 3 形式を扱います。
//! 型の解決（registry 参照）は `dispatch::locator` の責務で、ここでは文字列の分解のみ行います。

use std::fmt;

use super::errors::DispatchError;

/// 型名の区切り（`com.example.Target`）かつ、型とメソッド名の区切り。
pub const TYPE_SEPARATOR: char = '.';

/// ネスト型の区切り（`Outer$Inner`）。1 段のみ許可。
pub const NESTED_MARKER: char = '$';

/// A parsed rule reference: an optional declaring-type segment and a method name.
///
/// `declaring_type` is `None` when the text carried no type segment at all, in
/// which case the caller's default type is used.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleReference {
    declaring_type: Option<String>,
    method_name: String,
}

/// How the declaring-type segment of a reference addresses a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePath<'a> {
    /// No type segment: the caller's default type.
    Default,
    /// A plain type name.
    Named(&'a str),
    /// One level of member-type addressing (`Outer$Inner`).
    Nested { outer: &'a str, inner: &'a str },
}

impl RuleReference {
    pub fn new(declaring_type: Option<String>, method_name: impl Into<String>) -> Self {
        Self {
            declaring_type,
            method_name: method_name.into(),
        }
    }

    /// Split `text` on its last `.` into type segment and method name.
    pub fn parse(text: &str) -> Result<Self, DispatchError> {
        let text = text.trim();
        let (declaring_type, method_name) = match text.rsplit_once(TYPE_SEPARATOR) {
            Some((ty, method)) => {
                if ty.is_empty() {
                    return Err(DispatchError::MalformedReference(text.to_string()));
                }
                (Some(ty.to_string()), method)
            }
            None => (None, text),
        };

        if method_name.is_empty() || method_name.contains(NESTED_MARKER) {
            return Err(DispatchError::MalformedReference(text.to_string()));
        }

        Ok(Self::new(declaring_type, method_name))
    }

    pub fn declaring_type(&self) -> Option<&str> {
        self.declaring_type.as_deref()
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Classify the type segment. More than one nesting marker is rejected.
    pub fn type_path(&self) -> Result<TypePath<'_>, DispatchError> {
        let Some(ty) = self.declaring_type.as_deref() else {
            return Ok(TypePath::Default);
        };

        let mut parts = ty.split(NESTED_MARKER);
        let outer = parts.next().unwrap_or_default();
        let Some(inner) = parts.next() else {
            return Ok(TypePath::Named(ty));
        };
        if parts.next().is_some() {
            return Err(DispatchError::NestingTooDeep(ty.to_string()));
        }
        if outer.is_empty() || inner.is_empty() {
            return Err(DispatchError::MalformedReference(self.to_string()));
        }
        Ok(TypePath::Nested { outer, inner })
    }
}

impl fmt::Display for RuleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declaring_type {
            Some(ty) => write!(f, "{ty}{TYPE_SEPARATOR}{}", self.method_name),
            None => self.method_name.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn splits_on_last_separator() {
        let r = RuleReference::parse("com.example.Target.method1").unwrap();
        assert_eq!(r.declaring_type(), Some("com.example.Target"));
        assert_eq!(r.method_name(), "method1");
        assert_eq!(r.type_path().unwrap(), TypePath::Named("com.example.Target"));
    }

    #[test]
    fn bare_method_uses_default_type() {
        let r = RuleReference::parse("method1").unwrap();
        assert_eq!(r.declaring_type(), None);
        assert_eq!(r.type_path().unwrap(), TypePath::Default);
        assert_eq!(r.to_string(), "method1");
    }

    #[test]
    fn nested_marker_is_split_once() {
        let r = RuleReference::parse("com.example.Target$OtherClass.method1").unwrap();
        assert_eq!(
            r.type_path().unwrap(),
            TypePath::Nested {
                outer: "com.example.Target",
                inner: "OtherClass"
            }
        );
    }

    #[test]
    fn two_nesting_levels_are_rejected() {
        let r = RuleReference::parse("a.A$B$C.m").unwrap();
        assert!(matches!(r.type_path(), Err(DispatchError::NestingTooDeep(_))));
    }

    #[rstest]
    #[case::empty("")]
    #[case::trailing_dot("com.example.Target.")]
    #[case::leading_dot(".method")]
    #[case::marker_in_method("Target$Inner")]
    fn malformed_references(#[case] text: &str) {
        let err = RuleReference::parse(text).unwrap_err();
        assert!(matches!(err, DispatchError::MalformedReference(_)));
        assert!(err.is_resolution_error());
    }

    #[test]
    fn empty_inner_is_malformed() {
        let r = RuleReference::parse("a.Target$.m").unwrap();
        assert!(matches!(r.type_path(), Err(DispatchError::MalformedReference(_))));
    }
}
