use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};

/// Replace every paragraph holding nothing but a titled image with a
/// `<figure>` whose caption is the image title. Returns the number of figures.
pub(crate) fn wrap_captioned_images<'a>(root: &'a AstNode<'a>) -> usize {
    let mut paragraphs = Vec::new();
    collect_paragraphs(root, &mut paragraphs);

    let mut figures = 0;
    for paragraph in paragraphs {
        let Some(figure) = captioned_image(paragraph) else {
            continue;
        };

        let children: Vec<_> = paragraph.children().collect();
        for child in children {
            child.detach();
        }

        let mut data = paragraph.data.borrow_mut();
        data.value = NodeValue::HtmlBlock(NodeHtmlBlock {
            block_type: 0,
            literal: figure,
        });
        figures += 1;
    }
    figures
}

fn collect_paragraphs<'a>(node: &'a AstNode<'a>, buffer: &mut Vec<&'a AstNode<'a>>) {
    if matches!(node.data.borrow().value, NodeValue::Paragraph) {
        buffer.push(node);
        return;
    }

    let mut child = node.first_child();
    while let Some(next) = child {
        collect_paragraphs(next, buffer);
        child = next.next_sibling();
    }
}

fn captioned_image<'a>(paragraph: &'a AstNode<'a>) -> Option<String> {
    let image = paragraph.first_child()?;
    if image.next_sibling().is_some() {
        return None;
    }

    let (src, title) = {
        let data = image.data.borrow();
        match &data.value {
            NodeValue::Image(link) if !link.title.trim().is_empty() => {
                (link.url.clone(), link.title.clone())
            }
            _ => return None,
        }
    };

    let alt_raw = collect_inline_text(image);
    let alt = alt_raw.split_whitespace().collect::<Vec<_>>().join(" ");

    Some(format!(
        "<figure><img src=\"{}\" alt=\"{}\" /><figcaption>{}</figcaption></figure>\n",
        escape_attribute(&src),
        escape_attribute(&alt),
        ammonia::clean_text(title.trim()),
    ))
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\n' | '\r' | '\t' => escaped.push(' '),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}
