// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! JSON encoding of the step-expression and TTC-expression tagged variants.

use serde_json::{Map, Value};

use crate::error::LangError;
use crate::stepexpr::StepExpr;
use crate::stepexpr::StepExprBuilder;
use crate::ttc::{TtcExpr, TtcExprBuilder};

use super::{expect_array, expect_f64, expect_object, expect_str, violation};

pub fn step_expr_to_json(lang: &crate::model::Lang, expr: &StepExpr) -> Value {
    use StepExpr::*;
    let mut obj = Map::new();
    match expr {
        Union { lhs, rhs, .. } => {
            obj.insert("type".into(), "union".into());
            obj.insert("lhs".into(), step_expr_to_json(lang, lhs));
            obj.insert("rhs".into(), step_expr_to_json(lang, rhs));
        }
        Intersection { lhs, rhs, .. } => {
            obj.insert("type".into(), "intersection".into());
            obj.insert("lhs".into(), step_expr_to_json(lang, lhs));
            obj.insert("rhs".into(), step_expr_to_json(lang, rhs));
        }
        Difference { lhs, rhs, .. } => {
            obj.insert("type".into(), "difference".into());
            obj.insert("lhs".into(), step_expr_to_json(lang, lhs));
            obj.insert("rhs".into(), step_expr_to_json(lang, rhs));
        }
        Collect { lhs, rhs, .. } => {
            obj.insert("type".into(), "collect".into());
            obj.insert("lhs".into(), step_expr_to_json(lang, lhs));
            obj.insert("rhs".into(), step_expr_to_json(lang, rhs));
        }
        Transitive { inner, .. } => {
            obj.insert("type".into(), "transitive".into());
            obj.insert("expression".into(), step_expr_to_json(lang, inner));
        }
        SubType { inner, target, .. } => {
            obj.insert("type".into(), "subType".into());
            obj.insert("subType".into(), lang.asset(*target).name().into());
            obj.insert("expression".into(), step_expr_to_json(lang, inner));
        }
        Field { field, .. } => {
            obj.insert("type".into(), "field".into());
            obj.insert("name".into(), lang.field(*field).name().into());
        }
        AttackStep { step, .. } => {
            obj.insert("type".into(), "attackStep".into());
            obj.insert("name".into(), lang.attack_step(*step).name().into());
        }
        Variable { name, .. } => {
            obj.insert("type".into(), "variable".into());
            obj.insert("name".into(), name.clone().into());
        }
    }
    Value::Object(obj)
}

pub fn step_expr_from_json(value: &Value, path: &str) -> Result<StepExprBuilder, LangError> {
    let obj = expect_object(value, path)?;
    let ty = expect_str(obj, "type", path)?;

    let get_child = |key: &str| -> Result<&Value, LangError> {
        obj.get(key).ok_or_else(|| violation(path, format!("missing `{key}`")))
    };

    Ok(match ty {
        "union" => StepExprBuilder::union(
            step_expr_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            step_expr_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "intersection" => StepExprBuilder::intersection(
            step_expr_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            step_expr_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "difference" => StepExprBuilder::difference(
            step_expr_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            step_expr_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "collect" => StepExprBuilder::collect(
            step_expr_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            step_expr_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "transitive" => {
            StepExprBuilder::transitive(step_expr_from_json(get_child("expression")?, &format!("{path}.expression"))?)
        }
        "subType" => StepExprBuilder::sub_type(
            expect_str(obj, "subType", path)?,
            step_expr_from_json(get_child("expression")?, &format!("{path}.expression"))?,
        ),
        "field" => StepExprBuilder::field(expect_str(obj, "name", path)?),
        "attackStep" => StepExprBuilder::attack_step(expect_str(obj, "name", path)?),
        "variable" => StepExprBuilder::variable(expect_str(obj, "name", path)?),
        other => return Err(violation(path, format!("unknown step expression type `{other}`"))),
    })
}

pub fn ttc_to_json(ttc: &TtcExpr) -> Value {
    use TtcExpr::*;
    match ttc {
        Empty => Value::Null,
        Number(v) => obj(&[("type", "number".into()), ("value", (*v).into())]),
        Addition(l, r) => binary("addition", l, r),
        Subtraction(l, r) => binary("subtraction", l, r),
        Multiplication(l, r) => binary("multiplication", l, r),
        Division(l, r) => binary("division", l, r),
        Exponentiation(l, r) => binary("exponentiation", l, r),
        Function(dist, args) => obj(&[
            ("type", "function".into()),
            ("name", dist.name().into()),
            ("arguments", Value::Array(args.iter().map(|a| (*a).into()).collect())),
        ]),
    }
}

fn binary(ty: &str, lhs: &TtcExpr, rhs: &TtcExpr) -> Value {
    obj(&[("type", ty.into()), ("lhs", ttc_to_json(lhs)), ("rhs", ttc_to_json(rhs))])
}

fn obj(entries: &[(&str, Value)]) -> Value {
    let mut map = Map::new();
    for (k, v) in entries {
        map.insert((*k).to_string(), v.clone());
    }
    Value::Object(map)
}

pub fn ttc_from_json(value: &Value, path: &str) -> Result<TtcExprBuilder, LangError> {
    if value.is_null() {
        return Ok(TtcExprBuilder::Empty);
    }
    let obj = expect_object(value, path)?;
    let ty = expect_str(obj, "type", path)?;

    let get_child = |key: &str| -> Result<&Value, LangError> {
        obj.get(key).ok_or_else(|| violation(path, format!("missing `{key}`")))
    };

    Ok(match ty {
        "number" => TtcExprBuilder::number(expect_f64(obj, "value", path)?),
        "addition" => TtcExprBuilder::addition(
            ttc_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            ttc_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "subtraction" => TtcExprBuilder::subtraction(
            ttc_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            ttc_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "multiplication" => TtcExprBuilder::multiplication(
            ttc_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            ttc_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "division" => TtcExprBuilder::division(
            ttc_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            ttc_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "exponentiation" => TtcExprBuilder::exponentiation(
            ttc_from_json(get_child("lhs")?, &format!("{path}.lhs"))?,
            ttc_from_json(get_child("rhs")?, &format!("{path}.rhs"))?,
        ),
        "function" => {
            let name = expect_str(obj, "name", path)?;
            let args = expect_array(obj, "arguments", path)?
                .iter()
                .enumerate()
                .map(|(i, v)| {
                    v.as_f64().ok_or_else(|| violation(&format!("{path}.arguments[{i}]"), "expected a number"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            TtcExprBuilder::function(name, args)
        }
        other => return Err(violation(path, format!("unknown TTC expression type `{other}`"))),
    })
}
