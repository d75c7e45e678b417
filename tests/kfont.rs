use std::cell::RefCell;
use std::rc::Rc;

use kfont_html::{
    format, from_html, wrap_root, ClickListener, Color, Error, FontStyle, IgnoreTags,
    KFontHandler, SizeUnit, SpanKind, StyledText, TextSize,
};

fn kinds(text: &StyledText) -> Vec<SpanKind> {
    text.spans().iter().map(|s| s.kind.clone()).collect()
}

fn recorder() -> (ClickListener, Rc<RefCell<Vec<String>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener = ClickListener::new(move |flag| sink.borrow_mut().push(flag.to_string()));
    (listener, seen)
}

/// Every ordering of every non-empty subset of `items`.
fn arrangements<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let mut out = Vec::new();
    for (i, &first) in items.iter().enumerate() {
        out.push(vec![first]);
        let rest: Vec<T> = items
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &t)| t)
            .collect();
        for tail in arrangements(&rest) {
            let mut v = vec![first];
            v.extend(tail);
            out.push(v);
        }
    }
    out
}

#[test]
fn style_grammar_over_every_token_arrangement() -> Result<(), Box<dyn std::error::Error>> {
    #[derive(Clone, Copy, PartialEq)]
    enum T {
        B,
        I,
        U,
    }
    let synonyms = |t: T| match t {
        T::B => ["b", "bold", "B", "Bold"],
        T::I => ["i", "italic", "I", "ITALIC"],
        T::U => ["u", "underline", "U", "UnderLine"],
    };

    let mut checked = 0;
    for arrangement in arrangements(&[T::B, T::I, T::U]) {
        for pick in 0..4 {
            let value = arrangement
                .iter()
                .map(|&t| synonyms(t)[pick])
                .collect::<Vec<_>>()
                .join("_");
            let out = format(&format!(r#"<kFont style="{value}">ab</kFont>"#), None)?;

            let bold = arrangement.contains(&T::B);
            let italic = arrangement.contains(&T::I);
            let mut expected = Vec::new();
            let style = FontStyle::from_flags(bold, italic);
            if style != FontStyle::Normal {
                expected.push(SpanKind::Style(style));
            }
            if arrangement.contains(&T::U) {
                expected.push(SpanKind::Underline);
            }
            assert_eq!(kinds(&out), expected, "style={value}");
            assert!(out.spans().iter().all(|s| s.range() == (0..2)), "style={value}");
            checked += 1;
        }
    }
    // 15 arrangements of {b, i, u}, 4 spellings each.
    assert_eq!(checked, 60);
    Ok(())
}

#[test]
fn unrecognized_style_adds_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(r#"<kFont style="heavy">x</kFont>"#, None)?;
    assert!(out.spans().is_empty());
    Ok(())
}

#[test]
fn clickable_range_forwards_flag_once() -> Result<(), Box<dyn std::error::Error>> {
    let (listener, seen) = recorder();
    let out = format(r#"<kFont clickable="A">hi</kFont>"#, Some(listener))?;

    assert_eq!(out.as_str(), "hi");
    assert_eq!(out.spans().len(), 1);
    assert_eq!(out.spans()[0].range(), 0..2);
    assert!(matches!(&out.spans()[0].kind, SpanKind::Clickable(c) if c.flag == "A"));

    assert_eq!(out.click(1), 1);
    assert_eq!(*seen.borrow(), vec!["A".to_string()]);
    Ok(())
}

#[test]
fn clickable_has_no_visual_spans_of_its_own() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(r#"<kFont clickable="more">read</kFont>"#, None)?;
    assert_eq!(out.spans().len(), 1);
    Ok(())
}

#[test]
fn size_units_and_fallbacks() -> Result<(), Box<dyn std::error::Error>> {
    let size = |value: i32, unit| vec![SpanKind::AbsoluteSize(TextSize { value, unit })];

    let out = format(r#"<kFont size="12px">x</kFont>"#, None)?;
    assert_eq!(kinds(&out), size(12, SizeUnit::Pixels));
    assert_eq!(out.spans()[0].range(), 0..1);

    let out = format(r#"<kFont size="12">x</kFont>"#, None)?;
    assert_eq!(kinds(&out), size(12, SizeUnit::Scaled));

    let out = format(r#"<kFont size="16SP">x</kFont>"#, None)?;
    assert_eq!(kinds(&out), size(16, SizeUnit::Scaled));

    let out = format(r#"<kFont size="abc">x</kFont>"#, None)?;
    assert_eq!(kinds(&out), size(20, SizeUnit::Scaled));

    let out = format(r#"<kFont size=" 12 ">x</kFont>"#, None)?;
    assert_eq!(kinds(&out), size(20, SizeUnit::Scaled));

    for src in [r#"<kFont size="0">x</kFont>"#, "<kFont>x</kFont>", r#"<kFont size="-3px">x</kFont>"#] {
        assert!(format(src, None)?.spans().is_empty(), "{src}");
    }
    Ok(())
}

#[test]
fn non_numeric_suffixed_size_fails_the_whole_conversion() {
    for src in [r#"<kFont size="abcpx">x</kFont>"#, r#"<kFont size="bigSP">x</kFont>"#] {
        let err = format(src, None).unwrap_err();
        assert!(matches!(err, Error::InvalidSize(_)), "{src}");
    }
}

#[test]
fn bad_color_fails_the_whole_conversion() {
    let err = format(r#"ok <kFont color="bogus">x</kFont>"#, None).unwrap_err();
    assert!(matches!(err, Error::UnknownColor(ref c) if c == "bogus"));
}

#[test]
fn empty_tag_gives_zero_length_span() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(r##"<kFont color="#FF0000"></kFont>after<b>x</b>"##, None)?;
    assert_eq!(out.as_str(), "afterx");
    assert_eq!(out.spans().len(), 2);
    assert_eq!(out.spans()[0].kind, SpanKind::ForegroundColor(Color::RED));
    assert!(out.spans()[0].is_empty());
    assert_eq!(out.spans()[0].start, 0);
    assert_eq!(out.spans()[1].range(), 5..6);
    assert_eq!(out.spans()[1].kind, SpanKind::Style(FontStyle::Bold));
    Ok(())
}

#[test]
fn self_closing_tag_opens_and_closes() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(r#"a<kFont color="red"/>b"#, None)?;
    assert_eq!(out.as_str(), "ab");
    assert_eq!(out.spans()[0].range(), 1..1);
    Ok(())
}

#[test]
fn no_custom_tags_matches_the_base_walker() -> Result<(), Box<dyn std::error::Error>> {
    let src = "<p>Hello <b>world</b> &amp; <i>friends</i></p><font color=\"red\">red</font>";
    let with_kfont = format(src, None)?;
    let base = from_html(&wrap_root(src), &mut IgnoreTags)?;
    assert_eq!(with_kfont, base);
    Ok(())
}

#[test]
fn kfont_inside_base_markup() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(
        r##"<b>Total: <kFont color="#00FF00" size="18px">42</kFont></b>"##,
        None,
    )?;
    assert_eq!(out.as_str(), "Total: 42");
    assert_eq!(
        kinds(&out),
        vec![
            SpanKind::ForegroundColor(Color(0xFF00_FF00)),
            SpanKind::AbsoluteSize(TextSize {
                value: 18,
                unit: SizeUnit::Pixels
            }),
            SpanKind::Style(FontStyle::Bold),
        ]
    );
    assert_eq!(out.spans()[0].range(), 7..9);
    assert_eq!(out.spans()[2].range(), 0..9);
    Ok(())
}

#[test]
fn nested_kfont_is_rejected() {
    let err = format("<kFont>a<kFont>b</kFont></kFont>", None).unwrap_err();
    assert!(matches!(err, Error::NestedTag { offset: 1 }));
}

#[test]
fn sequential_tags_are_independent() -> Result<(), Box<dyn std::error::Error>> {
    let (listener, seen) = recorder();
    let out = format(
        r#"<kFont clickable="one">1</kFont> <kFont clickable="two">2</kFont>"#,
        Some(listener),
    )?;
    assert_eq!(out.as_str(), "1 2");
    out.click(2);
    out.click(0);
    out.click(1);
    assert_eq!(*seen.borrow(), vec!["two".to_string(), "one".to_string()]);
    Ok(())
}

#[test]
fn stray_close_is_harmless() -> Result<(), Box<dyn std::error::Error>> {
    let out = format("a</kFont>b", None)?;
    assert_eq!(out.as_str(), "ab");
    assert!(out.spans().is_empty());
    Ok(())
}

#[test]
fn unclosed_tag_runs_to_end_of_input() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(r#"x<kFont style="i">rest"#, None)?;
    assert_eq!(out.spans()[0].range(), 1..5);
    Ok(())
}

#[test]
fn inserted_text_at_boundaries_stays_outside() -> Result<(), Box<dyn std::error::Error>> {
    let mut out = format(r#"[<kFont style="u">mid</kFont>]"#, None)?;
    assert_eq!(out.spans()[0].range(), 1..4);
    out.insert(4, "+")?;
    out.insert(1, "-")?;
    assert_eq!(out.as_str(), "[-mid+]");
    assert_eq!(out.spans()[0].range(), 2..5);
    Ok(())
}

#[test]
fn handler_works_with_from_html_directly() -> Result<(), Box<dyn std::error::Error>> {
    let mut handler = KFontHandler::new(None);
    let out = from_html(r#"<KFONT style="bold">x</KFONT>"#, &mut handler)?;
    assert_eq!(kinds(&out), vec![SpanKind::Style(FontStyle::Bold)]);
    assert!(!handler.is_open());
    Ok(())
}

#[test]
fn dump_format() -> Result<(), Box<dyn std::error::Error>> {
    let out = format(
        r##"Hi <kFont color="#FF0000" style="b_u" clickable="A">there</kFont>!"##,
        None,
    )?;
    insta::assert_snapshot!(out.to_string().trim_end(), @r###"
    "Hi there!"
      3..8 clickable(A) "there"
      3..8 color(#FFFF0000) "there"
      3..8 style(bold) "there"
      3..8 underline "there"
    "###);
    Ok(())
}
