use palisade::uci;

fn main() {
    env_logger::init();
    uci::run();
}
