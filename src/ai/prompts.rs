//! # 商品提示词模板
//!
//! 面向西班牙语市场的提示词文本

/// 自动填充时允许的商品分类
pub const PRODUCT_CATEGORIES: [&str; 10] = [
    "Ropa",
    "Electrónicos",
    "Hogar",
    "Deportes",
    "Libros",
    "Juguetes",
    "Belleza",
    "Automotriz",
    "Jardín",
    "Oficina",
];

fn category_clause(category: Option<&str>) -> String {
    category
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!(" de la categoría '{c}'"))
        .unwrap_or_default()
}

/// 商品描述
#[must_use]
pub fn description_prompt(product_name: &str, category: Option<&str>) -> String {
    format!(
        "Genera una descripción atractiva y profesional para el producto '{product_name}'{}. \
         La descripción debe ser convincente para clientes potenciales, destacando \
         características clave y beneficios. Máximo 200 palabras.",
        category_clause(category)
    )
}

/// SEO 标题
#[must_use]
pub fn title_prompt(description: &str, category: Option<&str>) -> String {
    format!(
        "Genera un título atractivo y optimizado para SEO para un producto{} con la \
         siguiente descripción: '{description}'. El título debe ser conciso, atractivo y \
         contener palabras clave relevantes. Máximo 60 caracteres.",
        category_clause(category)
    )
}

/// 标签建议
#[must_use]
pub fn tags_prompt(product_name: &str, description: &str, category: Option<&str>) -> String {
    format!(
        "Sugiere 5-8 tags relevantes para el producto '{product_name}'{} con descripción: \
         '{description}'. Los tags deben ser palabras clave útiles para búsqueda y \
         categorización. Devuelve solo los tags separados por comas.",
        category_clause(category)
    )
}

/// 单张图片分析
#[must_use]
pub fn image_analysis_prompt(product_name: Option<&str>) -> String {
    let mut prompt = String::from(
        "Analiza esta imagen de producto y proporciona información sobre:\
         \n1. Tipo de producto\
         \n2. Características visuales principales\
         \n3. Posible categoría\
         \n4. Sugerencias de descripción",
    );
    if let Some(name) = product_name.filter(|n| !n.trim().is_empty()) {
        prompt.push_str(&format!("\n\nEl producto se llama: '{name}'"));
    }
    prompt
}

/// 完整分析，要求模型只返回 JSON
#[must_use]
pub fn auto_fill_prompt() -> String {
    let categories = PRODUCT_CATEGORIES.join(", ");
    format!(
        r#"Analiza esta imagen de producto y genera información completa para un e-commerce.
Responde SOLO en formato JSON con la siguiente estructura exacta:
{{
    "title": "Título atractivo del producto (máximo 60 caracteres)",
    "description": "Descripción detallada y convincente del producto (máximo 200 palabras)",
    "suggested_category": "Categoría más apropiada para este producto (debe ser una de: {categories})",
    "tags": "tag1, tag2, tag3, tag4, tag5",
    "price_suggestion": "Precio estimado en USD basado en el producto"
}}

El título debe ser atractivo y optimizado para SEO.
La descripción debe destacar características clave y beneficios.
La categoría DEBE ser una de estas opciones exactas: {categories}.
Los tags deben ser palabras clave útiles para búsqueda.
El precio debe ser realista basado en el tipo de producto."#
    )
}
