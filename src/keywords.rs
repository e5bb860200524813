//! Keyword tables for PPL
//!
//! Every table is kept in ASCII order of its upper-case spelling so lookups
//! can binary search without allocating. The grammar in `grammar/ppl.pest`
//! carries the same lists; the parser's grammar tests keep the two in sync.

use std::cmp::Ordering;

use serde::Serialize;

/// Reserved words that drive statement structure. None of them can be used
/// as an identifier.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "BEGIN", "BREAK", "CASE", "CONTINUE", "DECLARE", "DEFAULT", "DO", "ELSE", "ELSEIF", "END",
    "ENDFOR", "ENDFUNC", "ENDIF", "ENDLOOP", "ENDPROC", "ENDSELECT", "ENDWHILE", "FALSE", "FOR",
    "FUNCTION", "GOSUB", "GOTO", "IF", "LET", "LOOP", "NEXT", "NOT", "PROCEDURE", "REPEAT",
    "RETURN", "SELECT", "STEP", "STOP", "THEN", "TO", "TRUE", "UNTIL", "VAR", "WHILE",
];

/// Variable and parameter types. Types are reserved as well.
pub const TYPES: &[&str] = &[
    "BIGSTR", "BOOLEAN", "BYTE", "DATE", "DDATE", "DOUBLE", "DREAL", "DWORD", "EDATE", "FLOAT",
    "INT", "INTEGER", "LONG", "MONEY", "MSGAREAID", "PASSWORD", "REAL", "SBYTE", "SDWORD", "SHORT",
    "STRING", "SWORD", "TIME", "UBYTE", "UDWORD", "UNSIGNED", "UWORD", "WORD",
];

/// Predefined statements (`PRINTLN "hi"`, `FCLOSE 1`, ...).
pub const BUILTIN_STATEMENTS: &[&str] = &[
    "ADJBYTES", "ADJDBYTES", "ADJTBYTES", "ADJTFILES", "APPEND", "BACKUP", "BITCLEAR", "BITSET",
    "BYE", "CALL", "CDCHKOFF", "CDCHKON", "CHDIR", "CLREOL", "CLS", "COLOR", "CONFFLAG",
    "CONFUNFLAG", "COPY", "CURSOR", "DBGLEVEL", "DEC", "DELAY", "DELETE", "DELUSER", "DIR",
    "DISPFILE", "DISPSTR", "DISPTEXT", "DOWNLOAD", "DTROFF", "DTRON", "EVT", "FAPPEND", "FCLOSE",
    "FCLOSEALL", "FCREATE", "FDEFIN", "FDEFOUT", "FDGET", "FDPUT", "FDPUTLN", "FDPUTPAD", "FDREAD",
    "FDWRITE", "FGET", "FLAG", "FOPEN", "FORWARD", "FPUT", "FPUTLN", "FPUTPAD", "FREAD",
    "FREALTUSER", "FRESHLINE", "FSEEK", "FWRITE", "GETALTUSER", "GETTOKEN", "GETUSER", "GOODBYE",
    "HANGUP", "INC", "INPUT", "INPUTCC", "INPUTDATE", "INPUTINT", "INPUTMONEY", "INPUTSTR",
    "INPUTTEXT", "INPUTTIME", "INPUTYN", "JOIN", "KBDFILE", "KBDFLUSH", "KBDSTRING", "KBDSTUFF",
    "KEYFLUSH", "LANG", "LASTIN", "LOG", "MDMFLUSH", "MKDIR", "MORE", "MOUSEREG", "MPRINT",
    "MPRINTLN", "NEWLINE", "NEWLINES", "OPTEXT", "PAGEOFF", "PAGEON", "POP", "PRFOUND",
    "PRFOUNDLN", "PRINT", "PRINTLN", "PROMPTSTR", "PUSH", "PUTALTUSER", "PUTUSER", "QUEST",
    "RDUNET", "RDUSYS", "REDIM", "RENAME", "RESETDISP", "RESTSCRN", "RMDIR", "SAVESCRN", "SCRFILE",
    "SEARCHFIND", "SEARCHINIT", "SEARCHSTOP", "SHELL", "SORT", "SOUND", "SOUNDDELAY", "SPRINT",
    "SPRINTLN", "STACKABORT", "STARTDISP", "TOKENIZE", "TPACGET", "TPACPUT", "TPACREAD",
    "TPACWRITE", "TPAGET", "TPAPUT", "TPAREAD", "TPAWRITE", "WAIT", "WAITFOR", "WRUNET", "WRUSYS",
    "WRUSYSDOOR",
];

/// Predefined functions usable in call expressions (`LEN(s)`, `U_NAME()`, ...).
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "ABS", "ADJTIME", "AND", "BAND", "BNOT", "BOR", "BXOR", "CALLID", "CALLNUM", "CARRIER",
    "CCTYPE", "CDON", "CHATSTAT", "CONFALIAS", "CONFEXP", "CONFMW", "CONFREG", "CONFSEL",
    "CONFSYS", "CRC32", "CURCOLOR", "CURCONF", "CURSEC", "CURUSER", "DATE", "DAY", "DEFANS", "DOW",
    "EVTTIMEADJ", "EXIST", "FERR", "FILEINF", "FLAGCNT", "FMTCC", "FMTREAL", "GETX", "GETY",
    "GRAFMODE", "HIMSGNUM", "HOUR", "I2S", "INKEY", "INSTR", "INSTRR", "ISBITSET", "KBDBUFSIZE",
    "KBDFILUSED", "KINKEY", "LANGEXT", "LASTANS", "LEFT", "LEN", "LOMSGNUM", "LOWER", "LTRIM",
    "MASK_ALNUM", "MASK_ALPHA", "MASK_ASCII", "MASK_FILE", "MASK_NUM", "MASK_PATH", "MASK_PWD",
    "MAX", "MEGANUM", "MID", "MIN", "MIXED", "MKADDR", "MKDATE", "MONTH", "NOCHAR", "ONLOCAL",
    "OR", "PAGESTAT", "PCBACCOUNT", "PCBACCSTAT", "PCBNODE", "PPE_RNAME", "PPLBUFSIZE", "PSA",
    "RANDOM", "READLINE", "REGAH", "REGAL", "REGAX", "REGBH", "REGBL", "REGBX", "REGCF", "REGCH",
    "REGCL", "REGCX", "REGDH", "REGDI", "REGDL", "REGDS", "REGDX", "REGES", "REGF", "REGSI",
    "REPLACE", "REPLACESTR", "RIGHT", "RTRIM", "S2I", "SEC", "SPACE", "STRIP", "STRIPATX",
    "STRIPSTR", "TIME", "TIMEAP", "TINKEY", "TOBIGSTR", "TOBOOLEAN", "TOBYTE", "TODATE", "TODDATE",
    "TODREAL", "TOEDATE", "TOINTEGER", "TOMONEY", "TOREAL", "TOSBYTE", "TOSWORD", "TOTIME",
    "TOUNSIGNED", "TOWORD", "TRIM", "UNIXTIME", "UN_CITY", "UN_NAME", "UN_OPER", "UN_STAT",
    "UPPER", "USERALIAS", "U_LMR", "VALCC", "VALDATE", "VALTIME", "XOR", "YEAR",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordClass {
    Control,
    Type,
    BuiltinStatement,
    BuiltinFunction,
}

impl std::fmt::Display for KeywordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordClass::Control => write!(f, "control"),
            KeywordClass::Type => write!(f, "type"),
            KeywordClass::BuiltinStatement => write!(f, "builtin statement"),
            KeywordClass::BuiltinFunction => write!(f, "builtin function"),
        }
    }
}

/// Classify a word, ignoring case. Control keywords and types win over
/// builtins (`DATE` is both a type and a builtin function).
pub fn classify(word: &str) -> Option<KeywordClass> {
    if contains(CONTROL_KEYWORDS, word) {
        Some(KeywordClass::Control)
    } else if contains(TYPES, word) {
        Some(KeywordClass::Type)
    } else if contains(BUILTIN_STATEMENTS, word) {
        Some(KeywordClass::BuiltinStatement)
    } else if contains(BUILTIN_FUNCTIONS, word) {
        Some(KeywordClass::BuiltinFunction)
    } else {
        None
    }
}

/// Whether `word` can never be an identifier.
pub fn is_reserved(word: &str) -> bool {
    contains(CONTROL_KEYWORDS, word) || contains(TYPES, word)
}

pub fn is_type(word: &str) -> bool {
    contains(TYPES, word)
}

pub fn is_builtin_statement(word: &str) -> bool {
    contains(BUILTIN_STATEMENTS, word)
}

pub fn is_builtin_function(word: &str) -> bool {
    contains(BUILTIN_FUNCTIONS, word)
}

fn contains(table: &[&str], word: &str) -> bool {
    table
        .binary_search_by(|entry| cmp_ignore_ascii_case(entry, word))
        .is_ok()
}

fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_uppercase())
        .cmp(b.bytes().map(|c| c.to_ascii_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(table: &[&str]) {
        for pair in table.windows(2) {
            assert_eq!(
                cmp_ignore_ascii_case(pair[0], pair[1]),
                Ordering::Less,
                "{} must sort before {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_tables_are_sorted() {
        assert_sorted(CONTROL_KEYWORDS);
        assert_sorted(TYPES);
        assert_sorted(BUILTIN_STATEMENTS);
        assert_sorted(BUILTIN_FUNCTIONS);
    }

    #[test]
    fn test_tables_are_upper_case() {
        for table in [CONTROL_KEYWORDS, TYPES, BUILTIN_STATEMENTS, BUILTIN_FUNCTIONS] {
            for entry in table {
                assert_eq!(*entry, entry.to_ascii_uppercase());
            }
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("endif"), Some(KeywordClass::Control));
        assert_eq!(classify("EndWhile"), Some(KeywordClass::Control));
        assert_eq!(classify("integer"), Some(KeywordClass::Type));
        assert_eq!(classify("PrintLn"), Some(KeywordClass::BuiltinStatement));
        assert_eq!(classify("un_name"), Some(KeywordClass::BuiltinFunction));
        assert_eq!(classify("my_var"), None);
    }

    #[test]
    fn test_types_win_over_builtin_functions() {
        assert!(is_builtin_function("DATE"));
        assert_eq!(classify("date"), Some(KeywordClass::Type));
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved("if"));
        assert!(is_reserved("STRING"));
        assert!(!is_reserved("PRINTLN"));
        assert!(!is_reserved("LEN"));
        assert!(!is_reserved("ENDIFX"));
    }

    #[test]
    fn test_prefix_words_are_distinct() {
        assert!(is_builtin_statement("FDPUT"));
        assert!(is_builtin_statement("FDPUTLN"));
        assert!(!is_builtin_statement("FDPU"));
    }
}
