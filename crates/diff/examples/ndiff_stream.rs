use anyhow::Result;
use diff_desc::{parse_ndiff, DiffDescriptor};

// Output of Python's difflib.ndiff for a small edit
const NDIFF: &str = r#"  fn main() {
-     println!("Hello, world!");
?                      ^^---
+     println!("Hello, {}!", name);
?                      ^^  ++++++
  }
"#;

fn main() -> Result<()> {
    let stream = parse_ndiff(NDIFF)?;
    let desc = DiffDescriptor::build(stream)?;

    print!("{desc}");
    println!("\n{}", desc.stats());

    let violations = desc.violations();
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("{violation}");
        }
        anyhow::bail!("{} invariant violations", violations.len());
    }

    Ok(())
}
