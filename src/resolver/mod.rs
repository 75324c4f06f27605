// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The two-phase linker (`spec.md` §4.5).
//!
//! Phase 1 (structural) builds categories, asset shells, super-asset links
//! and associations/fields — nothing here depends on declaration order
//! across assets, since every name is resolved against the full set built
//! so far in this phase. Phase 2 (semantic) builds variables, then attack
//! steps, then their `requires`/`reaches` bodies; step-expression typing
//! goes through [`crate::stepexpr::type_step_expr`] against the
//! in-progress [`Lang`], which already implements
//! [`crate::stepexpr::AssetTyping`].
//!
//! There is no separate "partial model" type: the resolver builds the
//! final `Lang` value directly, one arena push at a time, which is what
//! lets `Lang`'s own inherited-lookup methods double as the resolver's
//! "resolved so far" queries (see the field doc on
//! [`Lang::declared_variables`](crate::model::lang::Lang)).

use std::collections::HashMap;

use log::debug;

use crate::builder::LangBuilder;
use crate::error::{EntityKind, LangError};
use crate::ids::{AssetId, AssocId, AttackStepId, FieldId, VariableId};
use crate::model::entities::{Asset, Association, AttackStep, Category, Field, StepsGroup, Variable};
use crate::model::Lang;
use crate::stepexpr::type_step_expr;

pub fn resolve(builder: LangBuilder) -> Result<Lang, LangError> {
    let defines = builder.defines.clone().build();
    if !defines.contains_key("id") {
        return Err(LangError::SchemaViolation("defines".into(), "missing required key `id`".into()));
    }
    if !defines.contains_key("version") {
        return Err(LangError::SchemaViolation("defines".into(), "missing required key `version`".into()));
    }

    let mut lang = Lang {
        defines,
        categories: Vec::new(),
        assets: Vec::new(),
        fields: Vec::new(),
        associations: Vec::new(),
        variables: Vec::new(),
        attack_steps: Vec::new(),
        license: builder.license.clone(),
        notice: builder.notice.clone(),
        category_by_name: HashMap::new(),
        asset_by_name: HashMap::new(),
        declared_variables: HashMap::new(),
    };

    link_categories(&mut lang, &builder)?;
    link_asset_shells(&mut lang, &builder)?;
    link_super_assets(&mut lang, &builder)?;
    link_associations(&mut lang, &builder)?;

    link_variables(&mut lang, &builder)?;
    link_attack_step_shells(&mut lang, &builder)?;
    check_step_type_overrides(&mut lang)?;
    link_steps(&mut lang, &builder)?;

    debug!(
        "resolved Lang: {} categories, {} assets, {} associations",
        lang.categories.len(),
        lang.assets.len(),
        lang.associations.len()
    );
    Ok(lang)
}

/// Phase 1, step 1: build all `Category` objects.
fn link_categories(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for cat_builder in &builder.categories {
        let id = crate::ids::CategoryId(lang.categories.len() as u32);
        lang.categories.push(Category { name: cat_builder.name.clone(), meta: cat_builder.build_meta(), assets: Vec::new() });
        lang.category_by_name.insert(cat_builder.name.clone(), id);
    }
    Ok(())
}

/// Phase 1, step 2: build all `Asset` shells in declaration order, each
/// registering itself with its category.
fn link_asset_shells(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for asset_builder in &builder.assets {
        let category = *lang
            .category_by_name
            .get(&asset_builder.category)
            .ok_or_else(|| LangError::UnknownReference(EntityKind::Category, asset_builder.category.clone()))?;

        let id = AssetId(lang.assets.len() as u32);
        lang.assets.push(Asset {
            name: asset_builder.name.clone(),
            meta: asset_builder.build_meta(),
            category,
            is_abstract: asset_builder.is_abstract,
            super_asset: None,
            variables: Vec::new(),
            attack_steps: Vec::new(),
            fields: Vec::new(),
            svg_icon: asset_builder.svg_icon.clone(),
            png_icon: asset_builder.png_icon.clone(),
        });
        lang.asset_by_name.insert(asset_builder.name.clone(), id);
        lang.categories[category.index()].assets.push(id);
        lang.declared_variables
            .insert(id, asset_builder.variables.iter().map(|v| v.name.clone()).collect());
    }
    Ok(())
}

/// Phase 1, step 3: connect super-assets by name, then reject any cycle.
fn link_super_assets(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for (i, asset_builder) in builder.assets.iter().enumerate() {
        if let Some(super_name) = &asset_builder.super_asset {
            let super_id = *lang
                .asset_by_name
                .get(super_name)
                .ok_or_else(|| LangError::UnknownReference(EntityKind::Asset, super_name.clone()))?;
            lang.assets[i].super_asset = Some(super_id);
        }
    }

    for start in 0..lang.assets.len() {
        let mut path = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut cur = Some(AssetId(start as u32));
        while let Some(a) = cur {
            if !seen.insert(a) {
                path.push(lang.assets[a.index()].name.clone());
                return Err(LangError::SuperAssetCycle(path.join(" -> ")));
            }
            path.push(lang.assets[a.index()].name.clone());
            cur = lang.assets[a.index()].super_asset;
        }
    }
    Ok(())
}

/// Phase 1, step 4: build all associations, creating and cross-linking the
/// two `Field`s of each.
fn link_associations(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    let mut seen_assocs: Vec<(String, AssetId, AssetId)> = Vec::new();

    for assoc_builder in &builder.associations {
        let left_asset = *lang
            .asset_by_name
            .get(&assoc_builder.left_asset)
            .ok_or_else(|| LangError::UnknownReference(EntityKind::Asset, assoc_builder.left_asset.clone()))?;
        let right_asset = *lang
            .asset_by_name
            .get(&assoc_builder.right_asset)
            .ok_or_else(|| LangError::UnknownReference(EntityKind::Asset, assoc_builder.right_asset.clone()))?;

        let key = (assoc_builder.name.clone(), left_asset, right_asset);
        if seen_assocs.contains(&key) {
            return Err(LangError::DuplicateName(EntityKind::Association, assoc_builder.name.clone()));
        }
        seen_assocs.push(key);

        if lang.asset_field(left_asset, &assoc_builder.left_field).is_some() {
            return Err(LangError::DuplicateName(EntityKind::Field, assoc_builder.left_field.clone()));
        }

        let assoc_id = AssocId(lang.associations.len() as u32);

        let left_id = FieldId(lang.fields.len() as u32);
        lang.fields.push(Field {
            name: assoc_builder.left_field.clone(),
            owner: left_asset,
            multiplicity: assoc_builder.left_mult,
            association: assoc_id,
            target_field: None,
        });

        if lang.asset_field(right_asset, &assoc_builder.right_field).is_some() {
            return Err(LangError::DuplicateName(EntityKind::Field, assoc_builder.right_field.clone()));
        }

        let right_id = FieldId(lang.fields.len() as u32);
        lang.fields.push(Field {
            name: assoc_builder.right_field.clone(),
            owner: right_asset,
            multiplicity: assoc_builder.right_mult,
            association: assoc_id,
            target_field: None,
        });

        lang.fields[left_id.index()].target_field = Some(right_id);
        lang.fields[right_id.index()].target_field = Some(left_id);
        lang.assets[left_asset.index()].fields.push(left_id);
        lang.assets[right_asset.index()].fields.push(right_id);

        lang.associations.push(Association {
            name: assoc_builder.name.clone(),
            meta: assoc_builder.build_meta(),
            left_field: left_id,
            right_field: right_id,
        });
    }
    Ok(())
}

/// Phase 2, step 5: build each asset's variables' step expressions, in
/// declaration order, recording each one's target asset as it resolves.
fn link_variables(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for asset_builder in &builder.assets {
        let asset_id = lang.asset_by_name[&asset_builder.name];
        for var_builder in &asset_builder.variables {
            let expr = type_step_expr(&*lang, &var_builder.expr, asset_id, false)?;
            let var_id = VariableId(lang.variables.len() as u32);
            lang.variables.push(Variable { name: var_builder.name.clone(), owner: asset_id, expr });
            lang.assets[asset_id.index()].variables.push(var_id);
        }
    }
    Ok(())
}

/// Phase 2, step 6 (part 1): build every attack step's tags/risk/ttc shell,
/// across all assets, before any `requires`/`reaches` is built — so that a
/// `reaches` element may name an attack step on any asset regardless of
/// declaration order.
fn link_attack_step_shells(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for asset_builder in &builder.assets {
        let asset_id = lang.asset_by_name[&asset_builder.name];
        for step_builder in &asset_builder.attack_steps {
            let ttc = step_builder.ttc.clone().map(|t| t.build()).transpose()?;
            let step_id = AttackStepId(lang.attack_steps.len() as u32);
            lang.attack_steps.push(AttackStep {
                name: step_builder.name.clone(),
                meta: step_builder.build_meta(),
                owner: asset_id,
                ty: step_builder.ty,
                tags: step_builder.tags.clone(),
                risk: step_builder.risk,
                ttc,
                requires: None,
                reaches: None,
            });
            lang.assets[asset_id.index()].attack_steps.push(step_id);
        }
    }
    Ok(())
}

/// Phase 2, step 7 (part of cross-cutting validation): a step's type must
/// match its nearest same-named super-step, if any.
fn check_step_type_overrides(lang: &Lang) -> Result<(), LangError> {
    for step_id in 0..lang.attack_steps.len() {
        let step_id = AttackStepId(step_id as u32);
        if let Some(super_id) = lang.super_step(step_id) {
            let step = &lang.attack_steps[step_id.index()];
            if lang.attack_steps[super_id.index()].ty != step.ty {
                return Err(LangError::StepTypeMismatch(step.name.clone()));
            }
        }
    }
    Ok(())
}

/// Phase 2, step 6 (part 2): build `requires`/`reaches` for every attack
/// step, now that all step shells (on every asset) exist.
fn link_steps(lang: &mut Lang, builder: &LangBuilder) -> Result<(), LangError> {
    for asset_builder in &builder.assets {
        let asset_id = lang.asset_by_name[&asset_builder.name];
        let step_ids = lang.assets[asset_id.index()].attack_steps.clone();

        for (step_builder, step_id) in asset_builder.attack_steps.iter().zip(step_ids) {
            if step_builder.requires.is_some() && !step_builder.ty.is_existence() {
                return Err(LangError::RequiresOnNonExistenceStep(step_builder.name.clone()));
            }

            let requires = step_builder
                .requires
                .as_ref()
                .map(|group| build_steps_group(&*lang, asset_id, group, false))
                .transpose()?;
            let reaches = step_builder
                .reaches
                .as_ref()
                .map(|group| build_steps_group(&*lang, asset_id, group, true))
                .transpose()?;

            lang.attack_steps[step_id.index()].requires = requires;
            lang.attack_steps[step_id.index()].reaches = reaches;
        }
    }
    Ok(())
}

fn build_steps_group(
    lang: &Lang,
    source: AssetId,
    group: &crate::builder::StepsGroupBuilder,
    require_terminal: bool,
) -> Result<StepsGroup, LangError> {
    let mut expressions = Vec::with_capacity(group.expressions.len());
    for expr_builder in &group.expressions {
        let expr = type_step_expr(lang, expr_builder, source, true)?;
        if require_terminal && expr.terminal_attack_step().is_none() {
            return Err(LangError::ReachesNotTerminal(lang.asset_name_of(source).to_string()));
        }
        expressions.push(expr);
    }
    Ok(StepsGroup { overrides: group.overrides, expressions })
}

impl Lang {
    fn asset_name_of(&self, asset: AssetId) -> &str { &self.assets[asset.index()].name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{AssetBuilder, AttackStepBuilder, CategoryBuilder, StepsGroupBuilder};
    use crate::model::entities::AttackStepType;
    use crate::stepexpr::StepExprBuilder;

    fn minimal_builder() -> LangBuilder {
        let mut b = LangBuilder::new();
        b.add_define("id", "x").unwrap();
        b.add_define("version", "1").unwrap();
        b
    }

    #[test]
    fn s1_minimal_lang_builds() {
        let mut b = minimal_builder();
        b.add_category(CategoryBuilder::new("C").unwrap()).unwrap();
        b.add_asset(AssetBuilder::new("A", "C").unwrap()).unwrap();
        let lang = b.build().unwrap();
        let asset = lang.get_asset("A").unwrap();
        assert_eq!(lang.category(asset.category()).name(), "C");
    }

    #[test]
    fn s5_super_asset_cycle_is_rejected() {
        let mut b = minimal_builder();
        b.add_category(CategoryBuilder::new("C").unwrap()).unwrap();
        let mut a = AssetBuilder::new("A", "C").unwrap();
        a.set_super_asset("B").unwrap();
        let mut a2 = AssetBuilder::new("B", "C").unwrap();
        a2.set_super_asset("A").unwrap();
        b.add_asset(a).unwrap();
        b.add_asset(a2).unwrap();
        let err = b.build().unwrap_err();
        assert!(matches!(err, LangError::SuperAssetCycle(_)));
    }

    #[test]
    fn s2_inheritance_and_override_resolves_ttc() {
        let mut b = minimal_builder();
        b.add_category(CategoryBuilder::new("C").unwrap()).unwrap();

        let mut base = AssetBuilder::new("Base", "C").unwrap();
        base.set_abstract(true);
        let mut base_step = AttackStepBuilder::new("compromise", AttackStepType::Or).unwrap();
        base_step.set_ttc(crate::ttc::TtcExprBuilder::function("Exponential", vec![1.0]));
        base.add_attack_step(base_step).unwrap();
        b.add_asset(base).unwrap();

        let mut derived = AssetBuilder::new("Derived", "C").unwrap();
        derived.set_super_asset("Base").unwrap();
        let derived_step = AttackStepBuilder::new("compromise", AttackStepType::Or).unwrap();
        derived.add_attack_step(derived_step).unwrap();
        b.add_asset(derived).unwrap();

        let lang = b.build().unwrap();
        let derived_asset = lang.get_asset("Derived").unwrap();
        let step_id = lang.asset_attack_step(lang.get_asset_id("Derived").unwrap(), "compromise").unwrap();
        let ttc = lang.effective_ttc(step_id).unwrap();
        assert_eq!(ttc.mean_ttc().unwrap(), 1.0);
        let _ = derived_asset;
    }

    #[test]
    fn s3_field_navigation_and_reaches() {
        let mut b = minimal_builder();
        b.add_category(CategoryBuilder::new("C").unwrap()).unwrap();

        let mut host = AssetBuilder::new("Host", "C").unwrap();
        host.add_variable("v", StepExprBuilder::field("apps")).unwrap();
        let mut reacher = AttackStepBuilder::new("pwn", AttackStepType::Or).unwrap();
        let mut reaches = StepsGroupBuilder::new(false);
        reaches.push(StepExprBuilder::collect(
            StepExprBuilder::field("apps"),
            StepExprBuilder::attack_step("exploit"),
        ));
        reacher.set_reaches(reaches);
        host.add_attack_step(reacher).unwrap();
        b.add_asset(host).unwrap();

        let mut app = AssetBuilder::new("App", "C").unwrap();
        app.add_attack_step(AttackStepBuilder::new("exploit", AttackStepType::Or).unwrap()).unwrap();
        b.add_asset(app).unwrap();

        b.add_association(
            crate::builder::AssociationBuilder::new(
                "Runs",
                "Host",
                "apps",
                crate::multiplicity::Multiplicity::ZERO_OR_MORE,
                "App",
                "host",
                crate::multiplicity::Multiplicity::ONE,
            )
            .unwrap(),
        );

        let lang = b.build().unwrap();
        let host_id = lang.get_asset_id("Host").unwrap();
        let app_id = lang.get_asset_id("App").unwrap();

        let v = lang.asset_variable(host_id, "v").unwrap();
        assert_eq!(lang.variable(v).target_asset(), app_id);

        let pwn = lang.asset_attack_step(host_id, "pwn").unwrap();
        let reaches = lang.effective_reaches(pwn);
        assert_eq!(reaches.len(), 1);
        assert!(reaches[0].terminal_attack_step().is_some());
    }

    #[test]
    fn s4_union_without_common_ancestor_is_rejected() {
        let mut b = minimal_builder();
        b.add_category(CategoryBuilder::new("C").unwrap()).unwrap();
        b.add_asset(AssetBuilder::new("A", "C").unwrap()).unwrap();
        b.add_asset(AssetBuilder::new("B", "C").unwrap()).unwrap();

        let mut hub = AssetBuilder::new("Hub", "C").unwrap();
        hub.add_variable("v", StepExprBuilder::union(StepExprBuilder::field("a"), StepExprBuilder::field("b")))
            .unwrap();
        b.add_asset(hub).unwrap();

        b.add_association(
            crate::builder::AssociationBuilder::new(
                "ToA",
                "Hub",
                "a",
                crate::multiplicity::Multiplicity::ONE,
                "A",
                "hub",
                crate::multiplicity::Multiplicity::ONE,
            )
            .unwrap(),
        );
        b.add_association(
            crate::builder::AssociationBuilder::new(
                "ToB",
                "Hub",
                "b",
                crate::multiplicity::Multiplicity::ONE,
                "B",
                "hub",
                crate::multiplicity::Multiplicity::ONE,
            )
            .unwrap(),
        );
        let err = b.build().unwrap_err();
        assert!(matches!(err, LangError::NoCommonSuperAsset(_, _)));
    }
}
