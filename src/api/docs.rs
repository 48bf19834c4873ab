//! Self-describing documentation for registered endpoints.
//!
//! Each endpoint answers its documentation probe (`OPTIONS` on its own
//! path) with a plain-text block, and an index page fetches those blocks
//! client-side, so the rendered docs always reflect the running server.

use crate::binding::ParamSpec;

/// Render the plain-text block served on an endpoint's documentation probe.
///
/// The first line is the HTTP method the endpoint accepts, followed by the
/// content-type expectation, one line per declared parameter and the
/// free-text description. `<` and `>` are escaped since the index page
/// injects the block into the DOM.
pub fn describe_endpoint(spec: &ParamSpec, description: &str) -> String {
    let mut block = String::from("POST\nExpects: application/json\n");

    for param in spec.params() {
        match &param.default {
            Some(default) => {
                block.push_str(&format!(
                    "{}: {} (default: {})\n",
                    param.name,
                    param.kind.name(),
                    default
                ));
            }
            None => {
                block.push_str(&format!(
                    "{}: {} (required)\n",
                    param.name,
                    param.kind.name()
                ));
            }
        }
    }

    block.push('\n');
    block.push_str(description);
    escape_html(&block)
}

/// Render the documentation index page.
///
/// The page embeds `sorted_paths` as a script payload; once loaded in a
/// browser it issues one synchronous probe request per path and appends
/// each response body to the document. The paths are expected in
/// ascending order so the page reads the same on every reload.
pub fn render_index(version: &str, sorted_paths: &[String]) -> String {
    let api_list =
        serde_json::to_string(sorted_paths).unwrap_or_else(|_| "[]".to_string());

    let mut page = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style type="text/css">
        body {{
            margin: 40px auto;
            max-width: 650px;
            line-height: 1.6;
            font-size: 18px;
            color: #444;
            padding: 0 10px;
        }}
        h1, h2, h3 {{ line-height: 1.2 }}
        pre {{
            background-color: beige;
            border-radius: 5px;
            padding: 15px;
            border: 1px solid black;
        }}
    </style>
</head>
<body>
    <h1>API Docs V{version}</h1>
    <p>The documentation is live and autogenerated.</p>
    <hr>
    <div id="docs"></div>
    <script>
        var api_list = {api_list};
"#
    );
    page.push_str(PROBE_SCRIPT);
    page
}

/// Client-side probe loop appended after the embedded path list.
const PROBE_SCRIPT: &str = r#"        for (var i = 0; i < api_list.length; ++i) {
            var url = api_list[i];
            var xmlhttp = new XMLHttpRequest();
            xmlhttp.open("OPTIONS", url, false);
            xmlhttp.onreadystatechange = function () {
                if (xmlhttp.readyState == 4 && xmlhttp.status == 200) {
                    var doc = document.createElement('pre');
                    doc.innerHTML = xmlhttp.responseText;
                    document.getElementById('docs').appendChild(doc);
                }
            };
            xmlhttp.send();
        }
    </script>
</body>
</html>
"#;

fn escape_html(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
