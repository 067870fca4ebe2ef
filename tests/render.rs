use pond::application::render::{
    AssetExtension, ComrakRenderService, RenderOutput, RenderPipelineConfig, RenderRequest,
    RenderService,
};

fn render_with(config: RenderPipelineConfig, markdown: &str) -> RenderOutput {
    ComrakRenderService::new(&config)
        .expect("renderer should build")
        .render(&RenderRequest::new("render-fixture", markdown))
        .expect("render succeeds")
}

fn render(markdown: &str) -> RenderOutput {
    render_with(RenderPipelineConfig::default(), markdown)
}

#[test]
fn gfm_table_and_strikethrough() {
    let output = render("| film | year |\n|------|------|\n| Ran | 1985 |\n\n~~draft~~ final\n");

    insta::assert_snapshot!(output.html, @r#"
    <table>
    <thead>
    <tr>
    <th>film</th>
    <th>year</th>
    </tr>
    </thead>
    <tbody>
    <tr>
    <td>Ran</td>
    <td>1985</td>
    </tr>
    </tbody>
    </table>
    <p><del>draft</del> final</p>
    "#);
}

#[test]
fn captioned_legacy_image_becomes_a_cdn_figure() {
    let output = render("![Still](https://cms.perakasem.com/assets/9f2c-41.jpg \"Opening shot\")\n");

    assert_eq!(output.figures, 1);
    assert_eq!(output.legacy_urls_rewritten, 1);
    insta::assert_snapshot!(output.html, @r#"<figure><img src="https://assets.perakasem.com/9f2c-41" alt="Still" /><figcaption>Opening&#32;shot</figcaption></figure>"#);
}

#[test]
fn figure_captions_are_escaped_as_text() {
    let output = render("![chart](/chart.svg \"1 < 2 & <b>bold</b>\")\n");

    assert_eq!(output.figures, 1);
    assert!(output.html.contains(
        "<figcaption>1&#32;&lt;&#32;2&#32;&amp;&#32;&lt;b&gt;bold&lt;&#47;b&gt;</figcaption>"
    ));
}

#[test]
fn preserve_policy_keeps_the_extension() {
    let config = RenderPipelineConfig {
        asset_extension: AssetExtension::Preserve,
        ..Default::default()
    };
    let output = render_with(
        config,
        "See <https://cms.perakasem.com/assets/abc-123.png> and ![x](https://cms.perakasem.com/assets/abc-123.png).\n",
    );

    assert_eq!(output.legacy_urls_rewritten, 2);
    assert_eq!(output.figures, 0);
    assert!(output.html.contains("https://assets.perakasem.com/abc-123.png"));
    assert!(!output.html.contains("cms.perakasem.com"));
}

#[test]
fn footnotes_and_task_lists_render() {
    let output = render("Claim.[^1]\n\n- [x] done\n- [ ] open\n\n[^1]: Source.\n");

    assert!(output.html.contains("<sup class=\"footnote-ref\">"));
    assert!(output.html.contains("Source."));
    assert!(output.html.contains("type=\"checkbox\""));
    assert!(output.html.contains("checked=\"\""));
}

#[test]
fn raw_html_passes_through_unless_sanitized() {
    let markdown = "<video src=\"/clip.mp4\" controls></video>\n\n<script>alert(1)</script>\n";

    let raw = render(markdown);
    assert!(raw.html.contains("<video src=\"/clip.mp4\" controls></video>"));
    assert!(raw.html.contains("<script>alert(1)</script>"));

    let sanitized = render_with(
        RenderPipelineConfig {
            sanitize: true,
            ..Default::default()
        },
        markdown,
    );
    assert!(sanitized.html.contains("<video"));
    assert!(!sanitized.html.contains("<script>"));
}

#[test]
fn rendering_is_deterministic() {
    let markdown = "# Title\n\n![a](https://cms.perakasem.com/assets/id \"cap\")\n\nText.\n";
    assert_eq!(render(markdown), render(markdown));
}
