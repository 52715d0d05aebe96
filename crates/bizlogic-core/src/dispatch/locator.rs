//! Rule Locator: rule reference text -> declaring type entry.

use crate::domain::{DispatchError, RuleReference, TypePath};
use crate::registry::{MethodRegistry, TypeEntry};

/// A reference bound to the registry entry it addresses.
#[derive(Debug)]
pub struct Located<'r> {
    pub reference: RuleReference,
    pub entry: &'r TypeEntry,
}

pub struct RuleLocator<'r> {
    registry: &'r MethodRegistry,
    default_type: &'r str,
}

impl<'r> RuleLocator<'r> {
    pub fn new(registry: &'r MethodRegistry, default_type: &'r str) -> Self {
        Self {
            registry,
            default_type,
        }
    }

    pub fn locate(&self, text: &str) -> Result<Located<'r>, DispatchError> {
        let reference = RuleReference::parse(text)?;
        let entry = self.resolve_type(&reference)?;
        Ok(Located { reference, entry })
    }

    /// Find the entry for an already parsed reference.
    pub fn resolve_type(&self, reference: &RuleReference) -> Result<&'r TypeEntry, DispatchError> {
        match reference.type_path()? {
            TypePath::Default => self.lookup(self.default_type),
            TypePath::Named(name) => self.lookup(name),
            TypePath::Nested { outer, inner } => {
                let outer_entry = self.lookup(outer)?;
                let key = outer_entry.member(inner).ok_or_else(|| {
                    DispatchError::MemberTypeNotFound {
                        outer: outer.to_string(),
                        inner: inner.to_string(),
                    }
                })?;
                self.lookup(key)
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<&'r TypeEntry, DispatchError> {
        self.registry
            .get(name)
            .ok_or_else(|| DispatchError::TypeNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{OTHER_CLASS, TARGET_TYPE, registry};

    #[test]
    fn bare_method_resolves_to_default_type() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let located = locator.locate("voidMethod").unwrap();
        assert_eq!(located.entry.name(), TARGET_TYPE);
        assert_eq!(located.reference.method_name(), "voidMethod");
    }

    #[test]
    fn qualified_default_type() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let located = locator.locate(&format!("{TARGET_TYPE}.voidMethod")).unwrap();
        assert_eq!(located.entry.name(), TARGET_TYPE);
    }

    #[test]
    fn nested_member_type() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let located = locator
            .locate(&format!("{TARGET_TYPE}$OtherClass.setStaticValue"))
            .unwrap();
        assert_eq!(located.entry.name(), OTHER_CLASS);
    }

    #[test]
    fn unknown_type() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let err = locator.locate("com.example.Missing.m").unwrap_err();
        assert_eq!(err, DispatchError::TypeNotFound("com.example.Missing".to_string()));
        assert!(err.is_resolution_error());
    }

    #[test]
    fn unknown_member_type() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let err = locator.locate(&format!("{TARGET_TYPE}$Nope.m")).unwrap_err();
        assert!(matches!(err, DispatchError::MemberTypeNotFound { .. }));
    }

    #[test]
    fn member_type_is_not_reachable_by_simple_name() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let err = locator.locate("OtherClass.setStaticValue").unwrap_err();
        assert!(matches!(err, DispatchError::TypeNotFound(_)));
    }

    #[test]
    fn second_nesting_level_is_rejected() {
        let registry = registry();
        let locator = RuleLocator::new(&registry, TARGET_TYPE);
        let err = locator
            .locate(&format!("{TARGET_TYPE}$OtherClass$Deeper.m"))
            .unwrap_err();
        assert!(matches!(err, DispatchError::NestingTooDeep(_)));
    }
}
