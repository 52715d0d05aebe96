//! Demo host: a device-info target, a run context, and the
//! `DeviceInfo$Features` member type whose enabled set lives at type level.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, PoisonError};

use bizlogic_core::{
    CallArgs, MethodRegistry, Raised, Receiver, RegistryBuilder, RegistryError, ReturnValue,
    Signature,
};

pub const DEVICE_TYPE: &str = "com.example.device.DeviceInfo";
pub const FEATURES_TYPE: &str = "com.example.device.DeviceInfo$Features";

/// Properties of the device under test plus notes left by actions.
#[derive(Debug, Default)]
pub struct DeviceInfo {
    properties: BTreeMap<String, String>,
    notes: Mutex<Vec<String>>,
}

impl DeviceInfo {
    pub fn new(properties: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            properties: properties.into_iter().collect(),
            notes: Mutex::default(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn note(&self, text: String) {
        self.notes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text);
    }
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub serial: String,
    pub sdk_level: u32,
}

#[derive(Debug, Default)]
pub struct FeatureState {
    enabled: Mutex<BTreeSet<String>>,
}

impl FeatureState {
    pub fn enabled(&self) -> Vec<String> {
        self.enabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn enable<'a>(&self, names: impl IntoIterator<Item = &'a String>) {
        let mut enabled = self.enabled.lock().unwrap_or_else(PoisonError::into_inner);
        enabled.extend(names.into_iter().cloned());
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.enabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }
}

fn device<'a>(recv: Receiver<'a>) -> Result<&'a DeviceInfo, Raised> {
    recv.instance::<DeviceInfo>()
}

fn sdk_level(args: &CallArgs<'_>, index: usize) -> Result<u32, Raised> {
    let level = args.string(index)?;
    level
        .parse()
        .map_err(|_| Raised::other(format!("not an sdk level: {level:?}")))
}

/// Build the demo registry. Features state is returned so callers can report it.
pub fn registry() -> Result<(MethodRegistry, Arc<FeatureState>), RegistryError> {
    let features = Arc::new(FeatureState::default());
    let d = DEVICE_TYPE;

    let registry = RegistryBuilder::new::<RunContext>()
        .declare_type(d)?
        .declare_member_type(d, "Features")?
        .type_state(FEATURES_TYPE, Arc::clone(&features))?
        .register(d, Signature::instance("hasProperty").string().returns_bool(), |recv, args| {
            Ok(ReturnValue::Bool(device(recv)?.property(args.string(0)?).is_some()))
        })?
        .register(
            d,
            Signature::instance("propertyEquals").string().string().returns_bool(),
            |recv, args| {
                let actual = device(recv)?.property(args.string(0)?);
                Ok(ReturnValue::Bool(actual == Some(args.string(1)?)))
            },
        )?
        .register(
            d,
            Signature::instance("sdkAtLeast")
                .context::<RunContext>()
                .string()
                .returns_bool(),
            |_, args| {
                let ctx = args.context::<RunContext>(0)?;
                Ok(ReturnValue::Bool(ctx.sdk_level >= sdk_level(args, 1)?))
            },
        )?
        .register(
            d,
            Signature::instance("serialIs")
                .string()
                .context::<RunContext>()
                .returns_bool(),
            |_, args| {
                let ctx = args.context::<RunContext>(1)?;
                Ok(ReturnValue::Bool(ctx.serial == args.string(0)?))
            },
        )?
        .register(d, Signature::instance("note").variadic(), |recv, args| {
            device(recv)?.note(args.group(0)?.join(" "));
            Ok(ReturnValue::Void)
        })?
        .register(d, Signature::instance("requireProperty").string(), |recv, args| {
            let key = args.string(0)?;
            match device(recv)?.property(key) {
                Some(_) => Ok(ReturnValue::Void),
                None => Err(Raised::assumption(format!("missing property {key}"))),
            }
        })?
        .register(
            d,
            Signature::instance("assertProperty").string().string(),
            |recv, args| {
                let (key, expected) = (args.string(0)?, args.string(1)?);
                match device(recv)?.property(key) {
                    Some(actual) if actual == expected => Ok(ReturnValue::Void),
                    actual => Err(Raised::assertion(format!(
                        "expected {key}={expected}, found {}",
                        actual.unwrap_or("<unset>")
                    ))),
                }
            },
        )?
        .register(d, Signature::instance("skip").string(), |_, args| {
            Err(Raised::assumption(args.string(0)?))
        })?
        .register(d, Signature::instance("fail").string(), |_, args| {
            Err(Raised::other(args.string(0)?))
        })?
        .register(FEATURES_TYPE, Signature::type_level("enable").variadic(), |recv, args| {
            recv.type_state::<FeatureState>()?.enable(args.group(0)?);
            Ok(ReturnValue::Void)
        })?
        .register(
            FEATURES_TYPE,
            Signature::type_level("isEnabled").string().returns_bool(),
            |recv, args| {
                let state = recv.type_state::<FeatureState>()?;
                Ok(ReturnValue::Bool(state.is_enabled(args.string(0)?)))
            },
        )?
        .build();

    Ok((registry, features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlogic_core::{
        BusinessLogicExecutor, DispatchError, ExecutorConfig, InvocationOutcome, RuleBook,
    };
    use rstest::rstest;

    fn setup() -> (BusinessLogicExecutor, Arc<FeatureState>) {
        let (registry, features) = registry().unwrap();
        let exec =
            BusinessLogicExecutor::new(Arc::new(registry), &ExecutorConfig::new(DEVICE_TYPE)).unwrap();
        (exec, features)
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn device() -> DeviceInfo {
        DeviceInfo::new([("model".to_string(), "pixel".to_string())])
    }

    #[rstest]
    #[case("propertyEquals", &["model", "pixel"], true)]
    #[case("propertyEquals", &["model", "other"], false)]
    #[case("hasProperty", &["model"], true)]
    #[case("hasProperty", &["brand"], false)]
    fn property_conditions(#[case] rule: &str, #[case] a: &[&str], #[case] expected: bool) {
        let (exec, _) = setup();
        let outcome = exec.execute_condition(rule, &args(a), &device(), None).unwrap();
        assert_eq!(outcome.as_bool(), Some(expected));
    }

    #[rstest]
    #[case("30", Some(true))]
    #[case("34", Some(false))]
    fn sdk_with_context(#[case] level: &str, #[case] expected: Option<bool>) {
        let (exec, _) = setup();
        let ctx = RunContext {
            serial: "abc".to_string(),
            sdk_level: 33,
        };
        let outcome = exec
            .execute_condition("sdkAtLeast", &args(&[level]), &device(), Some(&ctx))
            .unwrap();
        assert_eq!(outcome.as_bool(), expected);
    }

    #[test]
    fn sdk_without_context_does_not_resolve() {
        let (exec, _) = setup();
        let err = exec
            .execute_condition("sdkAtLeast", &args(&["30"]), &device(), None)
            .unwrap_err();
        assert!(matches!(err, DispatchError::ArityMismatch { context: false, .. }));
    }

    #[test]
    fn bad_sdk_level_fails() {
        let (exec, _) = setup();
        let ctx = RunContext {
            serial: "abc".to_string(),
            sdk_level: 33,
        };
        let outcome = exec
            .execute_condition("sdkAtLeast", &args(&["thirty"]), &device(), Some(&ctx))
            .unwrap();
        assert!(outcome.is_failed());
    }

    #[test]
    fn missing_property_skips() {
        let (exec, _) = setup();
        let outcome = exec
            .execute_action("requireProperty", &args(&["camera.flash"]), &device(), None)
            .unwrap();
        assert_eq!(outcome, InvocationOutcome::skipped("missing property camera.flash"));
    }

    #[test]
    fn assert_property_mismatch_is_assertion_style() {
        let (exec, _) = setup();
        let outcome = exec
            .execute_action("assertProperty", &args(&["model", "x"]), &device(), None)
            .unwrap();
        assert_eq!(
            outcome,
            InvocationOutcome::failed("expected model=x, found pixel", true)
        );
    }

    #[test]
    fn notes_and_features() {
        let (exec, features) = setup();
        let target = device();
        exec.execute_action("note", &args(&["hello", "world"]), &target, None)
            .unwrap();
        exec.execute_action("DeviceInfo$Features.enable", &args(&["wifi", "nfc"]), &target, None)
            .unwrap_err();
        exec.execute_action(
            &format!("{FEATURES_TYPE}.enable"),
            &args(&["wifi", "nfc"]),
            &target,
            None,
        )
        .unwrap();
        let on = exec
            .execute_condition(&format!("{FEATURES_TYPE}.isEnabled"), &args(&["nfc"]), &target, None)
            .unwrap();

        assert_eq!(target.notes(), vec!["hello world".to_string()]);
        assert_eq!(features.enabled(), vec!["nfc".to_string(), "wifi".to_string()]);
        assert_eq!(on.as_bool(), Some(true));
    }

    const DEMO_BOOK: &str = include_str!("../demos/device_rules.json");

    fn run_context(sdk_level: u32) -> RunContext {
        RunContext {
            serial: "emulator-5554".to_string(),
            sdk_level,
        }
    }

    #[test]
    fn demo_book_skips_torch_without_flash() {
        let book = RuleBook::from_json_str(DEMO_BOOK).unwrap();
        let (exec, features) = setup();
        let target = device();
        let ctx = run_context(34);

        let report = book
            .apply_logic_for("com.example.camera.FlashTest#testTorch", &exec, &target, Some(&ctx))
            .unwrap();
        assert_eq!(report.halted, Some(InvocationOutcome::skipped("device has no flash")));
        assert!(features.enabled().is_empty());
    }

    #[test]
    fn demo_book_enables_torch_with_flash() {
        let book = RuleBook::from_json_str(DEMO_BOOK).unwrap();
        let (exec, features) = setup();
        let target = DeviceInfo::new([("camera.flash".to_string(), "true".to_string())]);
        let ctx = run_context(34);

        let report = book
            .apply_logic_for("com.example.camera.FlashTest#testTorch", &exec, &target, Some(&ctx))
            .unwrap();
        assert_eq!(report.halted, None);
        assert_eq!(report.rules_matched, 1);
        assert_eq!(report.actions_invoked, 2);
        assert_eq!(features.enabled(), vec!["flash".to_string(), "torch".to_string()]);
        assert_eq!(target.notes(), vec!["torch enabled".to_string()]);
    }

    #[rstest]
    #[case("pixel", None)]
    #[case("other", Some(InvocationOutcome::failed("expected model=pixel, found other", true)))]
    fn demo_book_checks_model(#[case] model: &str, #[case] halted: Option<InvocationOutcome>) {
        let book = RuleBook::from_json_str(DEMO_BOOK).unwrap();
        let config = ExecutorConfig::new(DEVICE_TYPE)
            .with_redaction_patterns(book.redaction_patterns.iter().cloned());
        let (registry, _) = registry().unwrap();
        let exec = BusinessLogicExecutor::new(Arc::new(registry), &config).unwrap();
        let target = DeviceInfo::new([("model".to_string(), model.to_string())]);

        let report = book
            .apply_logic_for("com.example.device.IdentityTest#testModel", &exec, &target, None)
            .unwrap();
        assert_eq!(report.actions_invoked, 1);
        assert_eq!(report.halted, halted);
    }
}
