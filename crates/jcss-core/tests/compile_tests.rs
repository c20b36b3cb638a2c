use jcss_core::{CompileError, CompileOptions, Compiler};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn compile(input: Value) -> String {
    let mut compiler = Compiler::new();
    compiler.add(input).unwrap();
    compiler.compile().unwrap()
}

fn compile_minified(input: Value) -> String {
    let mut compiler = Compiler::with_options(CompileOptions::default().minified());
    compiler.add(input).unwrap();
    compiler.compile().unwrap()
}

#[test]
fn camel_case_properties_become_kebab_case() {
    assert_eq!(
        compile(json!({"body": {"marginTop": "20px"}})),
        "body {\n  margin-top: 20px;\n}\n"
    );
    assert_eq!(
        compile(json!({
            "body": {
                "paddingTop": "2px",
                "WebkitTransform": "rotate(7deg)",
                "fontWeight": "bold",
                "margin-top": "1px",
                ".headerNavigation": {"ABCDEFGHIJKLMNOPQRSTUVWXYZ": "20px"}
            }
        })),
        "body {\n  padding-top: 2px;\n  -webkit-transform: rotate(7deg);\n  font-weight: bold;\n  margin-top: 1px;\n}\n\
         body .headerNavigation {\n  -a-b-c-d-e-f-g-h-i-j-k-l-m-n-o-p-q-r-s-t-u-v-w-x-y-z: 20px;\n}\n"
    );
}

#[test]
fn keep_camel_case_passes_names_through() {
    let mut compiler = Compiler::new();
    compiler.add(json!({"body": {"lineHeight": "20px"}})).unwrap();
    let options = CompileOptions {
        keep_camel_case: true,
        ..CompileOptions::default()
    };
    assert_eq!(
        compiler.compile_with(&options).unwrap(),
        "body {\n  lineHeight: 20px;\n}\n"
    );
}

#[test]
fn later_adds_override_earlier_values() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({"body": {"font-size": "20px"}}))
        .unwrap()
        .add(json!({"body": {"font-size": "30px"}}))
        .unwrap();
    assert_eq!(compiler.compile().unwrap(), "body {\n  font-size: 30px;\n}\n");
}

#[test]
fn separate_adds_combine_properties() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({"body": {"font-size": "20px"}}))
        .unwrap()
        .add(json!({"body": {"padding": "30px"}}))
        .unwrap();
    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  font-size: 20px;\n  padding: 30px;\n}\n"
    );
}

#[test]
fn empty_rules_are_elided() {
    assert_eq!(compile(json!({"body": {}})), "");
}

#[test]
fn empty_string_value_is_quoted() {
    assert_eq!(
        compile(json!({"section": {":after": {"content": ""}}})),
        "section:after {\n  content: \"\";\n}\n"
    );
}

#[test]
fn pseudo_classes_and_parent_references() {
    assert_eq!(
        compile_minified(json!({
            "a": {
                "color": "red",
                ":hover": {"color": "blue"},
                "&.fancy": {"color": "green"}
            }
        })),
        "a{color: red;}a:hover{color: blue;}a.fancy{color: green;}"
    );
}

#[test]
fn every_parent_reference_is_replaced() {
    assert_eq!(
        compile_minified(json!({
            "a": {
                "color": "red",
                ":hover": {"color": "blue"},
                "&.fancy": {"color": "green"},
                ".ie6 &:hover, .ie7 &:hover": {"color": "orange"},
                ".ie6 &.fancy": {"color": "yellow"},
                ".ie7 &.fancy": {"color": "black"}
            }
        })),
        "a{color: red;}a:hover{color: blue;}a.fancy{color: green;}\
         .ie6 a:hover,.ie7 a:hover{color: orange;}\
         .ie6 a.fancy{color: yellow;}.ie7 a.fancy{color: black;}"
    );
}

#[test]
fn comma_selectors_fan_out_parent_major() {
    assert_eq!(
        compile_minified(json!({
            "body, section, h1": {
                "padding": "20px",
                "b, i": {"fontSize": "20px"}
            }
        })),
        "body,section,h1{padding: 20px;}\
         body b,body i,section b,section i,h1 b,h1 i{font-size: 20px;}"
    );
}

#[test]
fn comma_rule_shares_with_individual_rules() {
    assert_eq!(
        compile_minified(json!({
            "html, body": {"color": "red"},
            "body": {"background": "blue"},
            "html": {"background": "pink"}
        })),
        "html,body{color: red;}html{background: pink;}body{background: blue;}"
    );
}

#[test]
fn combines_selectors_with_identical_declarations() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({"body": {"font-size": "20px", "padding": "0"}}))
        .unwrap()
        .add(json!({
            "p": {
                "font-size": "20px",
                "margin": 0,
                "font-weight": "bold",
                "line-height": "30px",
                "border": "solid 1px #000"
            }
        }))
        .unwrap()
        .add(json!({
            "a": {"padding": "0 0 10px 0", "margin": 0, "border": "solid 1px #000"}
        }))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "body, p {\n  font-size: 20px;\n}\n\
         body {\n  padding: 0;\n}\n\
         p, a {\n  margin: 0;\n  border: solid 1px #000;\n}\n\
         p {\n  font-weight: bold;\n  line-height: 30px;\n}\n\
         a {\n  padding: 0 0 10px 0;\n}\n"
    );
}

#[test]
fn combine_selectors_can_be_turned_off() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({
            ".login-link": {"color": "red", "fontSize": "16px"},
            ".logout-link": {"color": "red", "fontSize": "11px"}
        }))
        .unwrap();

    assert_eq!(
        compiler
            .compile_with(&CompileOptions::default().minified())
            .unwrap(),
        ".login-link,.logout-link{color: red;}.login-link{font-size: 16px;}.logout-link{font-size: 11px;}"
    );

    let options = CompileOptions {
        minify: true,
        combine_selectors: false,
        ..CompileOptions::default()
    };
    assert_eq!(
        compiler.compile_with(&options).unwrap(),
        ".login-link{color: red;font-size: 16px;}.logout-link{color: red;font-size: 11px;}"
    );
}

#[test]
fn sequences_fold_into_one_rule() {
    let text_styles = |size: u32| {
        json!({
            "color": "#BADA55",
            "fontSize": format!("{size}px"),
            "lineHeight": format!("{size}px")
        })
    };
    assert_eq!(
        compile(json!({
            "body": {
                "color": "#BADA55",
                "p": text_styles(16),
                "h1": [text_styles(50), {"lineHeight": "60px"}]
            }
        })),
        "body, body p, body h1 {\n  color: #BADA55;\n}\n\
         body p {\n  font-size: 16px;\n  line-height: 16px;\n}\n\
         body h1 {\n  font-size: 50px;\n  line-height: 60px;\n}\n"
    );
}

#[test]
fn nested_objects_inside_sequences() {
    assert_eq!(
        compile_minified(json!({
            "body": [
                {"width": "80px"},
                {"span": {"display": "inline"}},
                {
                    "section": {"fontSize": "23px"},
                    "ul": [
                        {"margin": "10px"},
                        {"a": {"color": "blue"}},
                        {"padding": "20px"}
                    ]
                }
            ]
        })),
        "body{width: 80px;}body span{display: inline;}body section{font-size: 23px;}\
         body ul{margin: 10px;padding: 20px;}body ul a{color: blue;}"
    );
}

#[test]
fn media_queries_are_hoisted() {
    let mut compiler = Compiler::new();
    compiler.plugin("brand-color", |_| json!({"color": "#9fA"}));
    compiler
        .add(json!({
            "body": {
                "line-height": "20px",
                "@media all (max-width: 950px)": {
                    "line-height": "40px",
                    "color": "#BADA55"
                },
                "@media all (min-width: 550px)": {"line-height": "32px"},
                "p": {
                    "margin": "10px",
                    "padding": "4px",
                    "@media all (max-width: 950px)": {
                        "padding": "12px",
                        "brand-color": ""
                    }
                }
            }
        }))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  line-height: 20px;\n}\n\
         body p {\n  margin: 10px;\n  padding: 4px;\n}\n\
         @media all (max-width: 950px) {\n\
         body {\n  line-height: 40px;\n  color: #BADA55;\n}\n\
         body p {\n  padding: 12px;\n  color: #9fA;\n}\n\
         }\n\
         @media all (min-width: 550px) {\n\
         body {\n  line-height: 32px;\n}\n\
         }\n"
    );
}

#[test]
fn media_only_input_leaves_root_empty() {
    assert_eq!(
        compile(json!({"body": {"@media all (max-width: 950px)": {"color": "red"}}})),
        "@media all (max-width: 950px) {\nbody {\n  color: red;\n}\n}\n"
    );
}

#[test]
fn nested_media_chains_become_flat_blocks() {
    assert_eq!(
        compile_minified(json!({
            "section": {
                ".widget": {
                    "fontSize": "20px",
                    "@media screen and (max-width: 767px)": {"fontSize": "30px"}
                },
                "p": {
                    "@media screen and (max-width: 767px)": {
                        "a": {"color": "red"},
                        "@media screen and (max-width: 200px)": {
                            "span": {"lineHeight": "10px"}
                        }
                    }
                }
            },
            "@media screen and (max-width: 767px)": {
                "a": {"color": "red"},
                "div": {"color": "blue"},
                ".some-class": {"color": "green"}
            }
        })),
        "section .widget{font-size: 20px;}\
         @media screen and (max-width: 767px) {section .widget{font-size: 30px;}\
         section p a,a{color: red;}div{color: blue;}.some-class{color: green;}}\
         @media screen and (max-width: 200px) {section p span{line-height: 10px;}}"
    );
}

#[test]
fn keyframes_and_font_faces() {
    assert_eq!(
        compile(json!({
            "@font-face": {"fontFamily": "Brand", "src": "url(brand.woff2)"},
            "h1": {"fontFamily": "Brand"},
            ".spinner": {
                "animation": "spin 1s",
                "@keyframes spin": {
                    "from": {"transform": "rotate(0deg)"},
                    "to": {"transform": "rotate(360deg)"}
                }
            }
        })),
        "@font-face {\n  font-family: Brand;\n  src: url(brand.woff2);\n}\n\
         h1 {\n  font-family: Brand;\n}\n\
         .spinner {\n  animation: spin 1s;\n}\n\
         @keyframes spin {\n\
         from {\n  transform: rotate(0deg);\n}\n\
         to {\n  transform: rotate(360deg);\n}\n\
         }\n"
    );
}

#[test]
fn raw_text_keeps_its_place() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({"body": {"marginTop": "20px"}}))
        .unwrap()
        .raw("/* generated by jcss */")
        .add(json!({"a": {"paddingTop": "20px"}}))
        .unwrap()
        .raw("/* end of styles */");

    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  margin-top: 20px;\n}\n\
         /* generated by jcss */\n\
         a {\n  padding-top: 20px;\n}\n\
         /* end of styles */\n"
    );
}

#[test]
fn plugins_expand_in_place() {
    let mut compiler = Compiler::new();
    compiler
        .plugin("my-custom-gradient", |colors| {
            let colors: Vec<&str> = colors
                .as_array()
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            json!({"background": format!("linear-gradient(to bottom, {})", colors.join(", "))})
        })
        .plugin("brand-font-size", |size| {
            let px = match size.as_str() {
                Some("medium") => "22px",
                Some("big") => "32px",
                _ => "12px",
            };
            json!({"font-size": px})
        });
    compiler
        .add(json!({
            "body": {
                "margin": "20px",
                "font-size": "14px",
                "my-custom-gradient": ["#F00", "#00F"],
                "p": {"brand-font-size": "big"}
            }
        }))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  margin: 20px;\n  font-size: 14px;\n  background: linear-gradient(to bottom, #F00, #00F);\n}\n\
         body p {\n  font-size: 32px;\n}\n"
    );
}

#[test]
fn plugins_can_add_nested_selectors() {
    let mut compiler = Compiler::new();
    compiler.plugin("hoverEffect", |color| {
        json!({
            "&:hover": {
                "color": color,
                "background": "#f5f5f5",
                ".ie8 &": {"color": "blue"}
            },
            ".ie8 &": {"color": "#eee"}
        })
    });
    compiler
        .add(json!({"a": {"color": "#000", "hoverEffect": "#999"}}))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "a {\n  color: #000;\n}\n\
         a:hover {\n  color: #999;\n  background: #f5f5f5;\n}\n\
         .ie8 a:hover {\n  color: blue;\n}\n\
         .ie8 a {\n  color: #eee;\n}\n"
    );
}

#[test]
fn mixins_are_overridden_by_later_maps() {
    let mut compiler = Compiler::new();
    compiler.mixin("button", |args| {
        let color = args.first().and_then(Value::as_str).unwrap_or("#000");
        let thickness = args.get(1).and_then(Value::as_u64).unwrap_or(1);
        json!({
            "color": color,
            "display": "inline-block",
            "padding": "10px 20px",
            "border": format!("solid {thickness}px {color}"),
            "font-size": "10px"
        })
    });

    let button = compiler
        .apply_mixin("button", &[json!("#AAA"), json!(10)])
        .unwrap();
    compiler
        .add(json!({
            ".header-button": [button, {"color": "#F00", "font-size": "13px"}]
        }))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        ".header-button {\n  color: #F00;\n  display: inline-block;\n  padding: 10px 20px;\n  border: solid 10px #AAA;\n  font-size: 13px;\n}\n"
    );
}

#[test]
fn storage_values_feed_sequences() {
    let mut compiler = Compiler::new();
    compiler
        .storage_set_many(&json!({"red": "#FF0000", "green": "#00FF00"}))
        .unwrap();
    let red = compiler.storage_get("red").unwrap().clone();
    let green = compiler.storage_get("green").unwrap().clone();
    compiler
        .add(json!({
            "body": [
                {"color": red},
                {"background": green},
                {"width": "100%", "height": "100%"}
            ]
        }))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  color: #FF0000;\n  background: #00FF00;\n  width: 100%;\n  height: 100%;\n}\n"
    );
}

#[test]
fn rule_snapshot_as_json() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({
            "section": {
                "margin": 0,
                "padding": "20px",
                "a": {"padding": "20px"},
                "@media print": {"padding": "0"}
            }
        }))
        .unwrap();

    let snapshot = compiler.to_json().unwrap();
    assert_eq!(snapshot["mainstream"]["section"]["padding"], "20px");
    assert_eq!(snapshot["mainstream"]["section"]["margin"], "0");
    assert_eq!(snapshot["mainstream"]["section a"]["padding"], "20px");
    assert_eq!(snapshot["@media print"]["section"]["padding"], "0");
}

#[test]
fn flush_starts_a_new_document() {
    let mut compiler = Compiler::new();
    compiler.add(json!({"body": {"margin": "20px"}})).unwrap();
    assert_eq!(compiler.compile().unwrap(), "body {\n  margin: 20px;\n}\n");

    compiler.flush();
    compiler.add(json!({"body": {"padding": "20px"}})).unwrap();
    assert_eq!(compiler.compile().unwrap(), "body {\n  padding: 20px;\n}\n");
}

#[test]
fn malformed_keys_fail_the_whole_compile() {
    let mut compiler = Compiler::new();
    compiler
        .add(json!({"body": {"color": "red", "a[href": {"color": "blue"}}}))
        .unwrap();

    let err = compiler.compile().unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed key 'a[href' at body > a[href: unclosed '['"
    );
}

#[test]
fn self_invoking_plugins_are_reported() {
    let mut compiler = Compiler::new();
    compiler.plugin("again", |arg| json!({"again": arg}));
    compiler.add(json!({"body": {"again": "x"}})).unwrap();

    assert!(matches!(
        compiler.compile(),
        Err(CompileError::CyclicExtension { .. })
    ));
}

#[test]
fn scalar_input_is_rejected() {
    let mut compiler = Compiler::new();
    assert!(matches!(
        compiler.add(json!(42)),
        Err(CompileError::InvalidFragment { .. })
    ));
}

#[test]
fn grouping_keeps_shorthand_before_longhand() {
    assert_eq!(
        compile_minified(json!({
            ".b": {"margin-top": "5px"},
            ".a": {"margin": "0", "margin-top": "5px"}
        })),
        ".b{margin-top: 5px;}.a{margin: 0;margin-top: 5px;}"
    );
}

#[test]
fn plugin_output_can_turn_an_earlier_property_into_a_rule() {
    let mut compiler = Compiler::new();
    compiler.plugin("mix", |_| json!({"margin": {"color": "red"}, "padding": "1px"}));
    compiler
        .add(json!({"body": {"margin": "0", "mix": ""}}))
        .unwrap();

    assert_eq!(
        compiler.compile().unwrap(),
        "body {\n  padding: 1px;\n}\nbody margin {\n  color: red;\n}\n"
    );
}

#[test]
fn adding_the_same_fragment_twice_compiles_like_once() {
    let fragment = json!({
        "body": {
            "margin": "0",
            "p": [{"color": "red"}, {"a": {"color": "blue"}}],
            "@media print": {"margin": "1px"}
        }
    });
    let once = compile(fragment.clone());

    let mut compiler = Compiler::new();
    compiler.add(fragment.clone()).unwrap();
    compiler.add(fragment).unwrap();
    assert_eq!(compiler.compile().unwrap(), once);
}

#[test]
fn empty_lists_clear_a_property() {
    let mut compiler = Compiler::new();
    compiler.add(json!({"a": {"x": "1", "color": "red"}})).unwrap();
    compiler.add(json!({"a": {"x": []}})).unwrap();
    compiler.add(json!([])).unwrap();

    assert_eq!(compiler.compile().unwrap(), "a {\n  color: red;\n}\n");
}
