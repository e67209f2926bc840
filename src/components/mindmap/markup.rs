//! Inline rich-text value type for topic content.
//!
//! Topic text supports bold and italic runs and nothing else. Instead of
//! trusting whatever HTML the contenteditable surface accumulates, edits are
//! parsed into [`Markup`] and serialized back out, so the model never stores
//! markup it cannot re-render.

/// A run of text with a single style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
	pub text: String,
	pub bold: bool,
	pub italic: bool,
}

/// Topic text as an ordered list of styled runs.
///
/// Adjacent spans always differ in style and no span is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup {
	spans: Vec<Span>,
}

impl Markup {
	/// An unstyled run of text. Empty input yields empty markup.
	pub fn plain(text: &str) -> Self {
		let mut m = Markup::default();
		m.push_run(text, false, false);
		m
	}

	pub fn spans(&self) -> &[Span] {
		&self.spans
	}

	/// Concatenated text with styling dropped.
	pub fn plain_text(&self) -> String {
		self.spans.iter().map(|s| s.text.as_str()).collect()
	}

	/// True when the text is empty or whitespace only. An empty topic is
	/// deleted on commit, so this drives the cascade rules.
	pub fn is_empty(&self) -> bool {
		self.spans.iter().all(|s| s.text.trim().is_empty())
	}

	fn push_run(&mut self, text: &str, bold: bool, italic: bool) {
		if text.is_empty() {
			return;
		}
		if let Some(last) = self.spans.last_mut() {
			if last.bold == bold && last.italic == italic {
				last.text.push_str(text);
				return;
			}
		}
		self.spans.push(Span {
			text: text.to_string(),
			bold,
			italic,
		});
	}

	/// Parses the HTML a contenteditable region produced.
	///
	/// Only `<b>`/`<strong>` and `<i>`/`<em>` affect styling; `<br>` and
	/// block boundaries collapse to a space; every other tag is stripped
	/// while its text content is kept. Tolerant of unbalanced tags.
	pub fn parse_html(html: &str) -> Self {
		let mut out = Markup::default();
		let mut bold = 0i32;
		let mut italic = 0i32;
		let mut buf = String::new();
		let mut it = html.chars().peekable();

		let flush = |out: &mut Markup, buf: &mut String, bold: i32, italic: i32| {
			out.push_run(buf, bold > 0, italic > 0);
			buf.clear();
		};

		while let Some(c) = it.next() {
			match c {
				'<' => {
					let mut tag = String::new();
					for t in it.by_ref() {
						if t == '>' {
							break;
						}
						tag.push(t);
					}
					let body = tag.trim();
					let closing = body.starts_with('/');
					let name: String = body
						.trim_start_matches('/')
						.chars()
						.take_while(|ch| ch.is_ascii_alphanumeric())
						.collect::<String>()
						.to_ascii_lowercase();
					match name.as_str() {
						"b" | "strong" => {
							flush(&mut out, &mut buf, bold, italic);
							bold += if closing { -1 } else { 1 };
						}
						"i" | "em" => {
							flush(&mut out, &mut buf, bold, italic);
							italic += if closing { -1 } else { 1 };
						}
						"br" | "div" | "p" | "li" => {
							if !closing {
								buf.push(' ');
							}
						}
						_ => {}
					}
				}
				'&' => decode_entity(&mut it, &mut buf),
				_ => buf.push(c),
			}
		}
		flush(&mut out, &mut buf, bold, italic);
		out
	}

	/// Serializes back to the minimal HTML the parser accepts.
	pub fn to_html(&self) -> String {
		let mut html = String::new();
		for span in &self.spans {
			let escaped = escape(&span.text);
			match (span.bold, span.italic) {
				(true, true) => {
					html.push_str("<b><i>");
					html.push_str(&escaped);
					html.push_str("</i></b>");
				}
				(true, false) => {
					html.push_str("<b>");
					html.push_str(&escaped);
					html.push_str("</b>");
				}
				(false, true) => {
					html.push_str("<i>");
					html.push_str(&escaped);
					html.push_str("</i>");
				}
				(false, false) => html.push_str(&escaped),
			}
		}
		html
	}
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

/// Decodes the entity following a consumed `&` into `buf`. The common named
/// entities are handled; an unknown or unterminated candidate is not an
/// entity at all, so every consumed character is emitted verbatim.
fn decode_entity(it: &mut std::iter::Peekable<std::str::Chars<'_>>, buf: &mut String) {
	let mut name = String::new();
	while let Some(&c) = it.peek() {
		if c == ';' {
			it.next();
			match name.as_str() {
				"amp" => buf.push('&'),
				"lt" => buf.push('<'),
				"gt" => buf.push('>'),
				"quot" => buf.push('"'),
				"#39" | "apos" => buf.push('\''),
				"nbsp" => buf.push('\u{a0}'),
				_ => {
					buf.push('&');
					buf.push_str(&name);
					buf.push(';');
				}
			}
			return;
		}
		if !c.is_ascii_alphanumeric() && c != '#' {
			break;
		}
		if name.len() >= 8 {
			break;
		}
		name.push(c);
		it.next();
	}
	// No terminator in range; the ampersand was literal text.
	buf.push('&');
	buf.push_str(&name);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_round_trip() {
		let m = Markup::plain("hello world");
		assert_eq!(m.to_html(), "hello world");
		assert_eq!(Markup::parse_html("hello world"), m);
	}

	#[test]
	fn bold_and_italic_runs() {
		let m = Markup::parse_html("one <b>two</b> <i>three</i>");
		assert_eq!(m.spans().len(), 4);
		assert!(m.spans()[1].bold && !m.spans()[1].italic);
		assert!(m.spans()[3].italic);
		assert_eq!(m.to_html(), "one <b>two</b> <i>three</i>");
	}

	#[test]
	fn strong_and_em_are_aliases() {
		let m = Markup::parse_html("<strong>a</strong><em>b</em>");
		assert_eq!(m.to_html(), "<b>a</b><i>b</i>");
	}

	#[test]
	fn nested_styles() {
		let m = Markup::parse_html("<b>bold <i>both</i></b>");
		assert_eq!(m.to_html(), "<b>bold </b><b><i>both</i></b>");
		// Re-parsing the serialized form is stable.
		assert_eq!(Markup::parse_html(&m.to_html()), m);
	}

	#[test]
	fn unknown_tags_are_stripped_but_text_kept() {
		let m = Markup::parse_html("<span style=\"x\">kept</span><script>also</script>");
		assert_eq!(m.plain_text(), "keptalso");
		assert_eq!(m.to_html(), "keptalso");
	}

	#[test]
	fn entities_decode_and_re_escape() {
		let m = Markup::parse_html("a &amp; b &lt;c&gt;");
		assert_eq!(m.plain_text(), "a & b <c>");
		assert_eq!(m.to_html(), "a &amp; b &lt;c&gt;");
	}

	#[test]
	fn literal_ampersands_survive() {
		assert_eq!(Markup::parse_html("AT&T").plain_text(), "AT&T");
		assert_eq!(Markup::parse_html("fish & chips").plain_text(), "fish & chips");
		assert_eq!(Markup::parse_html("1 &amp 2").plain_text(), "1 &amp 2");
		assert_eq!(Markup::parse_html("ends with &").plain_text(), "ends with &");
	}

	#[test]
	fn unknown_entities_kept_verbatim() {
		assert_eq!(Markup::parse_html("&bogus;").plain_text(), "&bogus;");
		// And the round trip back through escaping is stable.
		let m = Markup::parse_html("&bogus;");
		assert_eq!(Markup::parse_html(&m.to_html()), m);
	}

	#[test]
	fn adjacent_same_style_runs_merge() {
		let m = Markup::parse_html("a<b></b>c");
		assert_eq!(m.spans().len(), 1);
		assert_eq!(m.plain_text(), "ac");
	}

	#[test]
	fn emptiness() {
		assert!(Markup::parse_html("").is_empty());
		assert!(Markup::parse_html("  <b> </b> ").is_empty());
		assert!(Markup::parse_html("&nbsp;").is_empty());
		assert!(!Markup::parse_html("x").is_empty());
	}

	#[test]
	fn br_collapses_to_space() {
		let m = Markup::parse_html("a<br>b");
		assert_eq!(m.plain_text(), "a b");
	}
}
