pub fn print_cli_version_banner(tool_name: &str, version: &str) {
    println!("{tool_name}");
    println!("Part of the blockpatch toolkit");
    println!();
    println!("\tVersion:     {version}");
}
