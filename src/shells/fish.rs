use super::Shell;

pub struct Fish;

impl Shell for Fish {
    fn template(&self) -> &'static str {
        r#"
function jmp_cd
    if [ (count $argv) -eq 0 ]
        jmp view
        return $status
    else
        set -l res (env %EXT_ENV%=1 jmp jump $argv)
        set -l ret $status
        switch $ret
        case %SUCCESS%; echo $res
        case %SUCCESS_DIR%; cd $res
        case %ERROR%; echo $res; and return 1
        case %ERROR_NO_INPUT%; return 1
        case '*'
            echo $res; and return $ret
        end
    end
end

function __jmp_track --on-variable PWD
    status --is-command-substitution; and return
    jmp visit (pwd) &; disown 2>/dev/null
end

alias z 'jmp_cd'
"#
    }
}
