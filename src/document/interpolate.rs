/// A piece of a `%`-style template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	/// Text copied verbatim.
	Literal(&'a str),

	/// `%(name)s`, replaced by the resolved value of `name`.
	Reference(&'a str),
}

/// Split a value into literal text and `%(name)s` references.
///
/// `%%` is an escaped percent sign. Any other use of `%` is rejected with a reason.
pub fn parse_template(template: &str) -> Result<Vec<Segment<'_>>, String> {
	let mut segments = Vec::new();
	let mut rest = template;

	while let Some(pos) = rest.find('%') {
		if pos > 0 {
			segments.push(Segment::Literal(&rest[..pos]));
		}
		let after = &rest[pos + 1..];

		if let Some(tail) = after.strip_prefix('%') {
			segments.push(Segment::Literal("%"));
			rest = tail;
		} else if let Some(body) = after.strip_prefix('(') {
			let close = body
				.find(')')
				.ok_or_else(|| format!("unterminated reference at offset {}", offset(template, rest) + pos))?;
			let name = &body[..close];
			rest = body[close + 1..].strip_prefix('s').ok_or_else(|| {
				format!("reference %({}) must be followed by 's'", name)
			})?;
			segments.push(Segment::Reference(name));
		} else {
			return Err(format!(
				"stray '%' at offset {} (use '%%' for a literal percent sign)",
				offset(template, rest) + pos
			));
		}
	}

	if !rest.is_empty() {
		segments.push(Segment::Literal(rest));
	}

	Ok(segments)
}

/// Byte offset of `tail` within `whole`, where `tail` is a suffix slice of `whole`.
fn offset(whole: &str, tail: &str) -> usize {
	whole.len() - tail.len()
}
