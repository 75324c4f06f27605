// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! `parse(serialize(L))` and `serialize(parse(J))` round-trip properties.

use langspec::builder::{AssetBuilder, AssociationBuilder, AttackStepBuilder, CategoryBuilder, LangBuilder, StepsGroupBuilder};
use langspec::model::entities::AttackStepType;
use langspec::multiplicity::Multiplicity;
use langspec::risk::Risk;
use langspec::stepexpr::StepExprBuilder;
use langspec::ttc::TtcExprBuilder;
use langspec::{json, Lang};

fn full_lang() -> Lang {
    let mut b = LangBuilder::new();
    b.add_define("id", "org.example.roundtrip").unwrap();
    b.add_define("version", "1.0.0").unwrap();
    b.add_category(CategoryBuilder::new("Network").unwrap()).unwrap();

    let mut host = AssetBuilder::new("Host", "Network").unwrap();
    host.add_variable("allApps", StepExprBuilder::field("apps")).unwrap();

    let mut compromise = AttackStepBuilder::new("compromise", AttackStepType::Or).unwrap();
    compromise.add_tag("critical").unwrap();
    compromise.set_risk(Risk::new(true, true, false));
    compromise.set_ttc(TtcExprBuilder::function("Exponential", vec![1.0]));
    let mut reaches = StepsGroupBuilder::new(false);
    reaches.push(StepExprBuilder::collect(StepExprBuilder::field("apps"), StepExprBuilder::attack_step("exploit")));
    compromise.set_reaches(reaches);
    host.add_attack_step(compromise).unwrap();
    b.add_asset(host).unwrap();

    let mut app = AssetBuilder::new("App", "Network").unwrap();
    app.add_attack_step(AttackStepBuilder::new("exploit", AttackStepType::Or).unwrap()).unwrap();
    b.add_asset(app).unwrap();

    b.add_association(
        AssociationBuilder::new(
            "Runs",
            "Host",
            "apps",
            Multiplicity::ZERO_OR_MORE,
            "App",
            "host",
            Multiplicity::ONE,
        )
        .unwrap(),
    );

    b.build().unwrap()
}

#[test]
fn serialize_then_parse_preserves_structure() {
    let lang = full_lang();
    let text = json::to_string_pretty(&lang).unwrap();
    let reparsed = json::from_str(&text).unwrap();

    assert_eq!(reparsed.assets().len(), lang.assets().len());
    let host = reparsed.get_asset("Host").unwrap();
    assert_eq!(host.name(), "Host");

    let host_id = reparsed.get_asset_id("Host").unwrap();
    let step_id = reparsed.asset_attack_step(host_id, "compromise").unwrap();
    assert_eq!(reparsed.effective_tags(step_id), vec!["critical".to_string()]);
    assert_eq!(reparsed.effective_risk(step_id), Some(Risk::new(true, true, false)));
    assert!(reparsed.effective_ttc(step_id).unwrap().mean_ttc().unwrap() > 0.0);
    assert_eq!(reparsed.effective_reaches(step_id).len(), 1);
}

#[test]
fn parse_then_serialize_is_stable() {
    let lang = full_lang();
    let text = json::to_string_pretty(&lang).unwrap();
    let reparsed = json::from_str(&text).unwrap();
    let text2 = json::to_string_pretty(&reparsed).unwrap();
    assert_eq!(text, text2);
}

/// A step with no locally-set TTC parses back to the builder-only `None`
/// (inherit) state, distinct from a JSON `ttc: null`, which always decodes
/// to an explicit empty expression.
#[test]
fn omitted_ttc_differs_from_explicit_null_ttc() {
    let mut b = LangBuilder::new();
    b.add_define("id", "org.example.ttc").unwrap();
    b.add_define("version", "1.0.0").unwrap();
    b.add_category(CategoryBuilder::new("Network").unwrap()).unwrap();
    let mut host = AssetBuilder::new("Host", "Network").unwrap();
    host.add_attack_step(AttackStepBuilder::new("idle", AttackStepType::Or).unwrap()).unwrap();
    b.add_asset(host).unwrap();
    let lang = b.build().unwrap();

    let host_id = lang.get_asset_id("Host").unwrap();
    let step_id = lang.asset_attack_step(host_id, "idle").unwrap();
    // No local or inherited ttc was ever set.
    assert!(lang.effective_ttc(step_id).is_none());

    // Serializing always emits a `ttc` key (null, since none was set), and
    // parsing that back in produces the explicit empty sentinel, not an
    // absent/"still inherits" state.
    let text = json::to_string_pretty(&lang).unwrap();
    assert!(text.contains("\"ttc\": null"));
    let reparsed = json::from_str(&text).unwrap();
    let reparsed_step = reparsed.asset_attack_step(reparsed.get_asset_id("Host").unwrap(), "idle").unwrap();
    let ttc = reparsed.effective_ttc(reparsed_step).unwrap();
    assert!(ttc.is_empty());
    assert_eq!(ttc.mean_ttc().unwrap(), 0.0);
}

#[test]
fn rejects_malformed_document() {
    let err = json::from_str("{ not json").unwrap_err();
    matches!(err, langspec::LangError::SchemaViolation(_, _));
}
