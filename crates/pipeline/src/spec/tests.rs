use super::*;
use crate::{
	errors::BuildError,
	runner::{run, run_single},
};

fn ints(xs: &[i64]) -> Vec<EventData> {
	xs.iter().map(|x| EventData::Integer(*x)).collect()
}

fn build(text: &str) -> Result<Processor, SpecError> {
	PipelineSpec::from_toml_str(text)?.build()
}

#[test]
fn port_refs() {
	assert_eq!(
		"a.3".parse::<PortSpec>().unwrap(),
		PortSpec {
			node: "a".into(),
			port: 3
		}
	);
	assert_eq!("a".parse::<PortSpec>().unwrap().port, 0);
	assert!("pipeline.1".parse::<PortSpec>().unwrap().is_boundary());
	assert!(matches!(
		"a.b".parse::<PortSpec>(),
		Err(SpecError::BadPortRef { .. })
	));
	assert!(matches!(
		"a.1.2".parse::<PortSpec>(),
		Err(SpecError::BadPortRef { .. })
	));
	assert!(matches!(
		".1".parse::<PortSpec>(),
		Err(SpecError::BadPortRef { .. })
	));
}

#[test]
fn double() {
	// x + x, with a fork feeding both sides of `Plus`
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.fork]
		processor = { type = "Fork" }

		[node.double]
		processor = { type = "ApplyFunction", function = { op = "Plus" } }

		[[edge]]
		from = "pipeline.0"
		to = "fork.0"

		[[edge]]
		from = "fork.0"
		to = "double.0"

		[[edge]]
		from = "fork.1"
		to = "double.1"

		[[edge]]
		from = "double"
		to = "pipeline"
		"#,
	)
	.unwrap();

	assert_eq!(p.input_arity(), 1);
	assert_eq!(p.output_arity(), 1);
	assert_eq!(run_single(&p, ints(&[1, 2, 3])).unwrap(), ints(&[2, 4, 6]));
}

#[test]
fn running_total() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.skip]
		processor = { type = "Trim", prefix = 1 }

		[node.total]
		processor = { type = "Cumulate", function = { op = "Plus" } }

		[node.every_other]
		processor = { type = "CountDecimate", interval = 2 }

		[[edge]]
		from = "pipeline.0"
		to = "skip.0"

		[[edge]]
		from = "skip.0"
		to = "total.0"

		[[edge]]
		from = "total.0"
		to = "every_other.0"

		[[edge]]
		from = "every_other.0"
		to = "pipeline.0"
		"#,
	)
	.unwrap();

	assert_eq!(
		run_single(&p, ints(&[9, 1, 2, 3, 4, 5])).unwrap(),
		ints(&[1, 6, 15])
	);
}

#[test]
fn nested_pipeline() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.inner.processor]
		type = "Group"
		pipeline.inputs = 1
		pipeline.outputs = 1
		pipeline.node.last.processor = { type = "KeepLast" }
		pipeline.edge = [
			{ from = "pipeline", to = "last" },
			{ from = "last", to = "pipeline" },
		]

		[node.label.processor]
		type = "ApplyFunction"
		function = { op = "ToUpper", args = [{ var = 0 }] }

		[[edge]]
		from = "pipeline"
		to = "inner"

		[[edge]]
		from = "inner"
		to = "label"

		[[edge]]
		from = "label"
		to = "pipeline"
		"#,
	);

	let p = p.unwrap();
	assert_eq!(
		run_single(&p, vec!["a".into(), "b".into()]).unwrap(),
		vec![EventData::from("B")]
	);
}

#[test]
fn parameterized_operators() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.split.processor]
		type = "ApplyFunction"
		function = { op = "SplitString", with = { separator = "," } }

		[node.unpack.processor]
		type = "Unpack"

		[node.upper.processor]
		type = "ApplyFunction"
		function = { op = "ToUpper" }

		[[edge]]
		from = "pipeline"
		to = "split"

		[[edge]]
		from = "split"
		to = "unpack"

		[[edge]]
		from = "unpack"
		to = "upper"

		[[edge]]
		from = "upper"
		to = "pipeline"
		"#,
	)
	.unwrap();

	assert_eq!(
		run_single(&p, vec!["a,b".into(), "c".into()]).unwrap(),
		vec![
			EventData::from("A"),
			EventData::from("B"),
			EventData::from("C")
		]
	);
}

#[test]
fn regex_then_replace_pairs() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.find.processor]
		type = "ApplyFunction"
		function = { op = "FindRegex", with = { pattern = "[0-9]" } }

		[node.unpack.processor]
		type = "Unpack"

		[node.spell.processor]
		type = "ApplyFunction"
		function = { op = "ReplaceAll", with = { pairs = [["1", "one"], ["2", "two"]] } }

		[[edge]]
		from = "pipeline"
		to = "find"

		[[edge]]
		from = "find"
		to = "unpack"

		[[edge]]
		from = "unpack"
		to = "spell"

		[[edge]]
		from = "spell"
		to = "pipeline"
		"#,
	)
	.unwrap();

	assert_eq!(
		run_single(&p, vec!["a1 b2".into()]).unwrap(),
		vec![EventData::from("one"), EventData::from("two")]
	);
}

#[test]
fn pack_two_inputs() {
	let p = build(
		r#"
		inputs = 2
		outputs = 1

		[node.pack.processor]
		type = "Pack"

		[[edge]]
		from = "pipeline.0"
		to = "pack.0"

		[[edge]]
		from = "pipeline.1"
		to = "pack.1"

		[[edge]]
		from = "pack"
		to = "pipeline"
		"#,
	)
	.unwrap();

	let flags = vec![false.into(), true.into(), false.into(), true.into()];
	assert_eq!(
		run(&p, vec![ints(&[1, 2, 3, 4]), flags]).unwrap(),
		vec![vec![EventData::list(ints(&[1])), EventData::list(ints(&[2, 3]))]]
	);
}

#[test]
fn count_distinct_events() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.seen.processor]
		type = "SetPutInto"

		[node.size.processor]
		type = "ApplyFunction"
		function = { op = "Size" }

		[[edge]]
		from = "pipeline"
		to = "seen"

		[[edge]]
		from = "seen"
		to = "size"

		[[edge]]
		from = "size"
		to = "pipeline"
		"#,
	)
	.unwrap();

	assert_eq!(run_single(&p, ints(&[5, 5, 6, 5])).unwrap(), ints(&[1, 1, 2, 2]));
}

#[test]
fn write_to_file() {
	let path = std::env::temp_dir().join(format!("brook-write-{}.txt", std::process::id()));
	let p = build(&format!(
		r#"
		inputs = 1

		[node.out.processor]
		type = "Write"
		path = "{}"

		[[edge]]
		from = "pipeline"
		to = "out"
		"#,
		path.display()
	))
	.unwrap();

	run(&p, vec![vec!["a".into(), "b\n".into()]]).unwrap();
	assert_eq!(std::fs::read_to_string(&path).unwrap(), "ab\n");
	std::fs::remove_file(&path).unwrap();
}

#[test]
fn operator_parameters_are_checked() {
	let node = |function: &str| {
		build(&format!(
			r#"
			[node.f.processor]
			type = "ApplyFunction"
			function = {function}
			"#
		))
	};

	assert!(matches!(
		node(r#"{ op = "FindRegex", with = { pattern = "(" } }"#),
		Err(SpecError::BadNode { .. })
	));
	assert!(matches!(
		node(r#"{ op = "FindRegexOnce" }"#),
		Err(SpecError::BadNode { .. })
	));
	assert!(matches!(
		node(r#"{ op = "ReplaceAll", with = { from = "a", pairs = [["b", "c"]] } }"#),
		Err(SpecError::BadNode { .. })
	));
	assert!(node(r#"{ op = "Get", with = { name = "k" } }"#).is_ok());
	assert!(node(r#"{ op = "IsSubsetOrEqual" }"#).is_ok());
}

#[test]
fn slices() {
	let p = build(
		r#"
		inputs = 1
		outputs = 1

		[node.count.processor]
		type = "Slice"
		key = { op = "IsEven" }
		policy = "KeyedMap"
		processor = { type = "Cumulate", function = { op = "Plus" } }

		[[edge]]
		from = "pipeline"
		to = "count"

		[[edge]]
		from = "count"
		to = "pipeline"
		"#,
	)
	.unwrap();

	let out = run_single(&p, ints(&[1, 2, 3])).unwrap();
	let out = out.iter().map(|x| x.to_string()).collect::<Vec<_>>();
	assert_eq!(
		out,
		vec!["{false: 1}", "{false: 1, true: 2}", "{false: 4, true: 2}"]
	);
}

#[test]
fn construction_errors_are_reported() {
	// Two edges into one input
	let e = build(
		r#"
		inputs = 2
		outputs = 0

		[node.a]
		processor = { type = "KeepLast" }

		[[edge]]
		from = "pipeline.0"
		to = "a"

		[[edge]]
		from = "pipeline.1"
		to = "a"
		"#,
	);
	assert!(matches!(
		e,
		Err(SpecError::Build(BuildError::PortAlreadyBound { .. }))
	));

	// Unmapped output
	let e = build(
		r#"
		inputs = 0
		outputs = 1

		[node.a]
		processor = { type = "Source", events = [1, 2] }
		"#,
	);
	assert!(matches!(
		e,
		Err(SpecError::Build(BuildError::UnboundBoundaryPort { .. }))
	));

	// Unknown node
	let e = build(
		r#"
		inputs = 1

		[[edge]]
		from = "pipeline"
		to = "nowhere"
		"#,
	);
	assert!(matches!(e, Err(SpecError::NoNode { .. })));

	// Reserved name
	let e = build(
		r#"
		[node.pipeline]
		processor = { type = "KeepLast" }
		"#,
	);
	assert!(matches!(e, Err(SpecError::ReservedName { .. })));

	// Bad parameter
	let e = build(
		r#"
		[node.a]
		processor = { type = "CountDecimate", interval = 0 }
		"#,
	);
	assert!(matches!(
		e,
		Err(SpecError::BadNode { error, .. })
			if matches!(*error, SpecError::Build(BuildError::InvalidParameter { .. }))
	));

	// Unknown operator
	let e = build(
		r#"
		[node.a]
		processor = { type = "ApplyFunction", function = { op = "Frobnicate" } }
		"#,
	);
	assert!(matches!(
		e,
		Err(SpecError::BadNode { error, .. })
			if matches!(*error, SpecError::BadOperator { .. })
	));

	// Unknown field
	let e = build(
		r#"
		[node.a]
		processor = { type = "Trim", prefix = 1 }
		priority = 2
		"#,
	);
	assert!(matches!(e, Err(SpecError::CouldNotParseFile { .. })));
}

#[test]
fn missing_file() {
	let e = PipelineSpec::from_file(Path::new("/definitely/not/a/real/file.toml"));
	assert!(matches!(e, Err(SpecError::CouldNotOpenFile { .. })));
}
