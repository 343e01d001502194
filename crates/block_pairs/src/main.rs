fn main() {
    block_pairs::run();
}
