use anyhow::{anyhow, Context, Result};
use handlebars::Handlebars;
use rust_embed::RustEmbed;

/// 内嵌的页面模板，编译期打进二进制
#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

/// 注册全部内嵌模板，模板名为去掉 .hbs 后缀的文件名
pub fn build_engine() -> Result<Handlebars<'static>> {
    let mut engine = Handlebars::new();

    for filename in Templates::iter() {
        let Some(name) = filename.strip_suffix(".hbs") else {
            continue;
        };
        let file = Templates::get(&filename).ok_or_else(|| anyhow!("读取内嵌模板 {} 失败", filename))?;
        let source =
            std::str::from_utf8(file.data.as_ref()).with_context(|| format!("模板 {} 不是合法 UTF-8", filename))?;
        engine
            .register_template_string(name, source)
            .with_context(|| format!("注册模板 {} 失败", filename))?;
    }

    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_registers_all_pages() {
        let engine = build_engine().expect("构建模板引擎失败");
        for name in ["index", "translation_result", "tokenization_result", "word_list"] {
            assert!(engine.has_template(name), "缺少模板 {}", name);
        }
    }

    #[test]
    fn test_word_list_renders_rows() {
        let engine = build_engine().unwrap();
        let body = engine
            .render(
                "word_list",
                &serde_json::json!({
                    "words": [{"id": 1, "english": "cat", "japanese": "猫", "pronunciation": "/kæt/"}]
                }),
            )
            .unwrap();
        assert!(body.contains("cat"));
        assert!(body.contains("/delete_word/1"));
    }

    #[test]
    fn test_translation_result_keeps_raw_html() {
        let engine = build_engine().unwrap();
        let body = engine
            .render(
                "translation_result",
                &serde_json::json!({"translation_result": "<p><strong>Hello</strong></p>"}),
            )
            .unwrap();
        // 译文已经是渲染好的 HTML，模板不能再转义
        assert!(body.contains("<strong>Hello</strong>"));
    }
}
