use rand::Rng;

use crate::{
    content::catalog::{CatalogConfig, TemplateKind},
    content::category::{Category, classify},
    content::scorer::score,
    content::selector::select,
    foundation::error::{ReelError, ReelResult},
};

/// Generated content bundle for one composition. Immutable once built.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptStructure {
    pub hook: String,
    pub opening: String,
    pub main_points: Vec<String>,
    pub retention: String,
    pub call_to_action: String,
    pub category: Category,
    pub engagement_score: f64,
}

/// Inputs to [`generate_script`] beyond the catalog and random source.
#[derive(Clone, Debug, Default)]
pub struct ScriptRequest<'a> {
    pub prompt: &'a str,
    /// Skip classification and use this category.
    pub category: Option<Category>,
    /// Use this hook instead of drawing one from the pool.
    pub hook: Option<&'a str>,
    /// How many main points to include (clamped to the catalog's list).
    pub main_point_count: usize,
}

/// Classify, draw hook/retention/CTA, and score the hook.
pub fn generate_script<R: Rng + ?Sized>(
    catalog: &CatalogConfig,
    req: &ScriptRequest<'_>,
    rng: &mut R,
) -> ReelResult<ScriptStructure> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ReelError::invalid_parameter("prompt must be non-empty"));
    }
    let category = req.category.unwrap_or_else(|| classify(prompt));
    catalog.validate_category(category)?;

    let hook = match req.hook {
        Some(h) if !h.trim().is_empty() => h.trim().to_string(),
        Some(_) => return Err(ReelError::invalid_parameter("hook override must be non-empty")),
        None => select(catalog, category, TemplateKind::Hook, rng)?,
    };
    let retention = select(catalog, category, TemplateKind::Retention, rng)?;
    let call_to_action = select(catalog, category, TemplateKind::Cta, rng)?;
    let engagement_score = score(&hook, category);

    Ok(ScriptStructure {
        opening: format!("In today's video, I'll show you {}", prompt.to_lowercase()),
        main_points: pick_main_points(&catalog.main_points, req.main_point_count)?,
        hook,
        retention,
        call_to_action,
        category,
        engagement_score,
    })
}

/// Leading points in order, always ending on the finale line.
fn pick_main_points(points: &[String], count: usize) -> ReelResult<Vec<String>> {
    let Some((finale, lead)) = points.split_last() else {
        return Err(ReelError::configuration("main_points must be non-empty"));
    };
    let count = count.clamp(1, points.len());
    let mut out: Vec<String> = lead.iter().take(count - 1).cloned().collect();
    out.push(finale.clone());
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/content/script.rs"]
mod tests;
