// Template helpers
// Presentation-only: raw output and small integer arithmetic

use handlebars::{
    handlebars_helper, Context, Handlebars, Helper, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;

handlebars_helper!(add: |a: i64, b: i64| a.checked_add(b));
handlebars_helper!(sub: |a: i64, b: i64| a.checked_sub(b));
handlebars_helper!(mul: |a: i64, b: i64| a.checked_mul(b));
// Division by zero renders nothing instead of failing the page
handlebars_helper!(div: |a: i64, b: i64| a.checked_div(b));

/// Write the first parameter without HTML escaping
fn safehtml(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("safehtml", 0))?;
    match param.value() {
        Value::String(s) => out.write(s)?,
        Value::Null => {}
        other => out.write(&other.to_string())?,
    }
    Ok(())
}

pub fn register(registry: &mut Handlebars<'_>) {
    registry.register_helper("safehtml", Box::new(safehtml));
    registry.register_helper("add", Box::new(add));
    registry.register_helper("sub", Box::new(sub));
    registry.register_helper("mul", Box::new(mul));
    registry.register_helper("div", Box::new(div));
}
