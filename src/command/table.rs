//! The command → strategy table. Supporting a new command is an entry here,
//! never a new code path.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::CommandStrategy;
use super::CommandStrategy::{KeepAll, KeepFirstN, KeyValuePairs, ScriptWithKeys};

const KEEP_ONE: CommandStrategy = KeepFirstN(1);
const KEEP_TWO: CommandStrategy = KeepFirstN(2);

/// Commands whose arguments are all structural: key names, channels, counts,
/// flags, cluster and server introspection.
const KEEP_ALL_COMMANDS: &[&str] = &[
    // Cluster
    "CLUSTER", "READONLY", "READWRITE",
    // Connection
    "CLIENT", "ECHO", "PING", "QUIT", "SELECT",
    // Geo
    "GEOADD", "GEODIST", "GEOHASH", "GEOPOS", "GEORADIUS", "GEORADIUS_RO", "GEORADIUSBYMEMBER",
    // Hashes
    "HDEL", "HEXISTS", "HGET", "HGETALL", "HINCRBY", "HINCRBYFLOAT", "HKEYS", "HLEN", "HMGET",
    "HSCAN", "HSTRLEN", "HVALS",
    // HyperLogLog
    "PFCOUNT", "PFMERGE",
    // Keys
    "DEL", "DUMP", "EXISTS", "EXPIRE", "EXPIREAT", "KEYS", "MOVE", "OBJECT", "PERSIST", "PEXPIRE",
    "PEXPIREAT", "PTTL", "RANDOMKEY", "RENAME", "RENAMENX", "SCAN", "SORT", "TOUCH", "TTL", "TYPE",
    "UNLINK", "WAIT",
    // Lists
    "BLMOVE", "BLPOP", "BRPOP", "BRPOPLPUSH", "LINDEX", "LLEN", "LMOVE", "LPOP", "LRANGE", "LTRIM",
    "RPOP", "RPOPLPUSH",
    // Pub/Sub
    "PSUBSCRIBE", "PUBSUB", "PUNSUBSCRIBE", "SUBSCRIBE", "UNSUBSCRIBE",
    // Scripting
    "SCRIPT",
    // Server
    "ACL", "BGREWRITEAOF", "BGSAVE", "COMMAND", "DBSIZE", "DEBUG", "FLUSHALL", "FLUSHDB", "INFO",
    "LASTSAVE", "LATENCY", "LOLWUT", "MEMORY", "MODULE", "MONITOR", "PSYNC", "REPLICAOF", "ROLE",
    "SAVE", "SHUTDOWN", "SLAVEOF", "SLOWLOG", "SWAPDB", "SYNC", "TIME",
    // Sets
    "SCARD", "SDIFF", "SDIFFSTORE", "SINTER", "SINTERSTORE", "SMEMBERS", "SPOP", "SRANDMEMBER",
    "SSCAN", "SUNION", "SUNIONSTORE",
    // Sorted sets
    "BZPOPMAX", "BZPOPMIN", "ZCARD", "ZINTER", "ZINTERSTORE", "ZPOPMAX", "ZPOPMIN", "ZRANGE",
    "ZREMRANGEBYRANK", "ZREVRANGE", "ZSCAN", "ZUNION", "ZUNIONSTORE",
    // Streams
    "XACK", "XCLAIM", "XDEL", "XGROUP", "XINFO", "XLEN", "XPENDING", "XRANGE", "XREAD",
    "XREADGROUP", "XREVRANGE", "XTRIM",
    // Strings
    "BITCOUNT", "BITFIELD", "BITOP", "BITPOS", "DECR", "DECRBY", "GET", "GETBIT", "GETRANGE",
    "INCR", "INCRBY", "INCRBYFLOAT", "MGET", "SETBIT", "STRALGO", "STRLEN",
    // Transactions
    "DISCARD", "EXEC", "MULTI", "UNWATCH", "WATCH",
];

/// Commands with at least one argument position that may hold user data or
/// credentials.
const REDACTING_COMMANDS: &[(&str, CommandStrategy)] = &[
    // Connection
    ("AUTH", CommandStrategy::REDACT_ALL),
    // HELLO can carry AUTH username/password
    ("HELLO", KEEP_TWO),
    // Hashes
    ("HMSET", KeyValuePairs(1)),
    ("HSET", KeyValuePairs(1)),
    ("HSETNX", KEEP_TWO),
    // HyperLogLog
    ("PFADD", KEEP_ONE),
    // Keys; MIGRATE can carry AUTH data after the sixth argument
    ("MIGRATE", KeepFirstN(6)),
    ("RESTORE", KEEP_TWO),
    // Lists
    ("LINSERT", KEEP_TWO),
    ("LPOS", KEEP_ONE),
    ("LPUSH", KEEP_ONE),
    ("LPUSHX", KEEP_ONE),
    ("LREM", KEEP_ONE),
    ("LSET", KEEP_ONE),
    ("RPUSH", KEEP_ONE),
    ("RPUSHX", KEEP_ONE),
    // Pub/Sub
    ("PUBLISH", KEEP_ONE),
    // Scripting
    ("EVAL", ScriptWithKeys),
    ("EVALSHA", ScriptWithKeys),
    // Server; CONFIG SET can change any property, the master password included
    ("CONFIG", KEEP_TWO),
    // Sets
    ("SADD", KEEP_ONE),
    ("SISMEMBER", KEEP_ONE),
    ("SMISMEMBER", KEEP_ONE),
    ("SMOVE", KEEP_TWO),
    ("SREM", KEEP_ONE),
    // Sorted sets
    ("ZADD", KEEP_ONE),
    ("ZCOUNT", KEEP_ONE),
    ("ZINCRBY", KEEP_ONE),
    ("ZLEXCOUNT", KEEP_ONE),
    ("ZMSCORE", KEEP_ONE),
    ("ZRANGEBYLEX", KEEP_ONE),
    ("ZRANGEBYSCORE", KEEP_ONE),
    ("ZRANK", KEEP_ONE),
    ("ZREM", KEEP_ONE),
    ("ZREMRANGEBYLEX", KEEP_ONE),
    ("ZREMRANGEBYSCORE", KEEP_ONE),
    ("ZREVRANGEBYLEX", KEEP_ONE),
    ("ZREVRANGEBYSCORE", KEEP_ONE),
    ("ZREVRANK", KEEP_ONE),
    ("ZSCORE", KEEP_ONE),
    // Streams
    ("XADD", KeyValuePairs(2)),
    // Strings
    ("APPEND", KEEP_ONE),
    ("GETSET", KEEP_ONE),
    ("MSET", KeyValuePairs(0)),
    ("MSETNX", KeyValuePairs(0)),
    ("PSETEX", KEEP_TWO),
    ("SET", KEEP_ONE),
    ("SETEX", KEEP_TWO),
    ("SETNX", KEEP_ONE),
    ("SETRANGE", KEEP_ONE),
];

/// Read-only after first use; shared freely across threads.
pub static COMMAND_TABLE: LazyLock<HashMap<&'static str, CommandStrategy>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(KEEP_ALL_COMMANDS.len() + REDACTING_COMMANDS.len());
    for &command in KEEP_ALL_COMMANDS {
        table.insert(command, KeepAll);
    }
    for &(command, strategy) in REDACTING_COMMANDS {
        table.insert(command, strategy);
    }
    table
});
