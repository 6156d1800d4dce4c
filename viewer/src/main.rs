fn main() -> anyhow::Result<()> {
    viewer::run()
}
